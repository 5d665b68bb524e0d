use std::cell::Cell;
use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use flatzone::store::has_checkpoint_file;
use flatzone::{
    run_scan, BusPublisher, CheckpointSlot, FileStore, ScanConfig, ScanControl, ScanOutcome, Scanner, StartMode,
    StopPolicy, SuspendReason, ZoneMessage, DEFAULT_RADIUS, DEFAULT_SCAN_ID,
};
use futures::executor::block_on;
use futures::StreamExt;
use log::info;
use terrain::prelude::{HeightmapGenerator, XZCoords, Zone};

mod canvas;

use canvas::ZoneCanvas;

#[derive(Parser)]
#[command(author, version, about = "Scan generated terrain for flat building zones", long_about = None)]
struct Args {
    /// The seed for terrain generation
    #[arg(short, long, default_value = "42")]
    seed: u32,

    /// X of the scan center
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    x: i32,

    /// Z of the scan center
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    z: i32,

    /// Radius of the scanned disc, in blocks
    #[arg(short, long, default_value_t = DEFAULT_RADIUS)]
    radius: i32,

    /// Snap terrain heights down to multiples of this step
    #[arg(long, default_value_t = 2)]
    terrace: i32,

    /// Identity the checkpoint is stored under
    #[arg(long, default_value = DEFAULT_SCAN_ID)]
    scan_id: String,

    /// Directory holding checkpoint files
    #[arg(long, default_value = "target/checkpoints")]
    checkpoint_dir: PathBuf,

    /// Continue from the stored checkpoint instead of starting over
    #[arg(long)]
    resume: bool,

    /// Pause and checkpoint after this many cursor positions
    #[arg(long)]
    pause_after: Option<u64>,

    /// Stop the scan once this many cells have been measured
    #[arg(long, conflicts_with = "pause_after")]
    stop_after: Option<u64>,

    /// Keep a checkpoint of a stopped scan for inspection; it is never resumed
    #[arg(long)]
    keep_stopped: bool,

    /// Print the stored checkpoint and exit
    #[arg(long)]
    status: bool,

    /// The output PNG file path
    #[arg(short, long, default_value = "target/zones.png")]
    output: PathBuf,

    /// Also write the published zone messages as JSON
    #[arg(long)]
    zones_out: Option<PathBuf>,

    /// Pixels per world unit when rendering the image
    #[arg(long, default_value_t = 10)]
    scale: u32,
}

fn print_status(args: &Args, slot: &CheckpointSlot<FileStore>) {
    if !has_checkpoint_file(&args.checkpoint_dir, &args.scan_id) {
        println!("{}: no checkpoint", args.scan_id);
        return;
    }
    match slot.status() {
        Some(status) => println!(
            "{}: {:?} at {} ({} open components, {} cells visited)",
            args.scan_id, status.reason, status.cursor, status.open_components, status.visited_cells
        ),
        None => println!("{}: checkpoint is unreadable and will be discarded", args.scan_id),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut slot = CheckpointSlot::new(FileStore::new(&args.checkpoint_dir), args.scan_id.clone());
    if args.status {
        print_status(&args, &slot);
        return Ok(());
    }

    let stop_policy = if args.keep_stopped { StopPolicy::Checkpoint } else { StopPolicy::Discard };
    let config = ScanConfig::new(XZCoords::new(args.x, args.z), args.radius)?
        .with_scan_id(args.scan_id.clone())?
        .with_stop_policy(stop_policy);
    let region = config.region;

    let control = ScanControl::new();
    if let Some(cells) = args.pause_after {
        control.pause_after(cells);
    }

    let generator = HeightmapGenerator::new(args.seed).with_terrace(args.terrace);
    let measured = Cell::new(0u64);
    let remote = control.clone();
    let stop_after = args.stop_after;
    let terrain = move |cell: XZCoords| {
        measured.set(measured.get() + 1);
        if Some(measured.get()) == stop_after {
            remote.stop();
        }
        generator.sample_height(cell)
    };
    let (publisher, rx) = BusPublisher::channel(args.scan_id.clone(), 64);
    let canvas = ZoneCanvas::new(region, args.scale)?;
    let mut scanner = Scanner::new(config, terrain, publisher)
        .with_markers(canvas)
        .with_control(control);

    let mode = if args.resume { StartMode::Resume } else { StartMode::Fresh };
    let scan = async move {
        let report = run_scan(&mut scanner, &mut slot, mode).await;
        let (publisher, canvas) = scanner.into_parts();
        drop(publisher);
        (report, canvas)
    };
    let bus = rx
        .inspect(|message: &ZoneMessage| {
            let p = &message.payload;
            info!("{} -> {}: zone {}x{} at {:?}", message.source, message.target, p.size[0], p.size[1], p.center);
        })
        .collect::<Vec<ZoneMessage>>();
    let ((report, canvas), messages) = block_on(async { futures::join!(scan, bus) });
    let report = report?;

    match report.outcome {
        ScanOutcome::Completed { zones, cells } => {
            println!("scan complete: {} zones from {} cells", zones, cells);
        }
        ScanOutcome::Suspended { reason, cursor, zones, cells } => {
            println!(
                "scan suspended ({:?}) at {} after {} cells, {} zones so far{}",
                reason,
                cursor,
                cells,
                zones,
                if report.checkpointed { "; checkpoint saved" } else { "" }
            );
            if reason == SuspendReason::Stop {
                info!("stopped scans are not resumed; the next run starts over");
            }
        }
    }

    let zones: Vec<Zone> = messages.iter().map(|m| m.payload.to_zone()).collect();
    canvas.save(&zones, &args.output)?;
    info!("image written to {}", args.output.display());

    if let Some(path) = &args.zones_out {
        serde_json::to_writer_pretty(File::create(path)?, &messages)?;
        info!("{} zone messages written to {}", messages.len(), path.display());
    }

    Ok(())
}

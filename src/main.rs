use interlocking::report;
use interlocking::scenario::{self, Scenario};
use interlocking::{Interlocking, Topology};
use log::*;

use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "interlocking", about = "Railway interlocking simulator.")]
struct Opt {
    /// Scenario script to run
    #[structopt(name = "SCRIPT")]
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Topology file. The built-in eleven-section network is used if absent.
    #[structopt(long)]
    #[structopt(parse(from_os_str))]
    topology: Option<PathBuf>,

    /// Write the report as JSON.
    #[structopt(short)]
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Activate debug mode
    #[structopt(short, long)]
    verbose: bool,

    /// Print time spent in each phase
    #[structopt(long)]
    timing: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _h1 = hprof::enter("init");

    let opt = Opt::from_args();
    let level = if opt.verbose {
        if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    } else {
        LevelFilter::Error
    };
    simple_logger::SimpleLogger::new().with_level(level).init()?;
    info!("{:#?}", opt);
    drop(_h1);

    let (mut engine, script) = {
        let _h = hprof::enter("load");
        let topology = match &opt.topology {
            Some(path) => Topology::from_json_file(path)?,
            None => Topology::standard(),
        };
        (
            Interlocking::new(&topology)?,
            Scenario::from_json_file(&opt.script)?,
        )
    };

    let records = scenario::run(&mut engine, &script);
    let rejected = records
        .iter()
        .filter(|r| matches!(r.outcome, scenario::Outcome::Rejected(_)))
        .count();
    info!("Ran {} steps, {} rejected.", records.len(), rejected);
    print!("{}", report::print_report(&records, &engine));

    if let Some(f) = &opt.output {
        report::write_report_json(f, &records, &engine)?;
        info!("Wrote report to file {}", f.display());
    }

    if opt.timing {
        hprof::end_frame();
        hprof::profiler().print_timing();
    }
    Ok(())
}

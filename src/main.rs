mod args;
mod compression;
mod context;
mod error;
mod manifest;
mod rebuild;
mod report;
mod result;
mod tpl;
mod utils;

use args::Args;
use context::Context;
use manifest::Job;
use report::Console;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let args = Args::parse();
    let ctx = Context::new(args.config.clone(), args.verbose);

    cliclack::intro("hwpx-repack")?;

    let job = Job::resolve(&ctx, &args)?;

    if ctx.verbose {
        cliclack::log::remark(format!(
            "Repacking {} members from {} into {}",
            job.manifest.entries().len(),
            job.source_root.display(),
            job.output_path.display()
        ))?;
    }

    let mut console = Console::new(ctx.verbose);
    rebuild::rebuild(&job, &mut console)?;

    Ok(())
}

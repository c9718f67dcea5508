use plotkit::{init_logging, Config, ToolpathCompiler};
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!("Usage: plotkit <input.svg> [output.gcode]");
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else { usage() };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&input).with_extension("gcode"));

    let job = ToolpathCompiler::new(Config::default()).compile_file(&input)?;
    job.program.save(&output)?;

    println!("Compiled {} -> {}", input, output.display());
    println!("  Paths:          {}", job.stats.path_count);
    println!("  Commands:       {}", job.stats.command_count);
    println!("  Total length:   {:.1} mm", job.stats.total_length_mm);
    println!("  Rapid moves:    {}", job.stats.rapid_moves);
    println!("  Draw moves:     {}", job.stats.draw_moves);
    println!(
        "  Estimated time: {:.1} sec ({:.1} min)",
        job.stats.estimated_time_sec,
        job.stats.estimated_time_sec / 60.0
    );

    if !job.warnings.is_empty() {
        println!("Warnings:");
        for warning in &job.warnings {
            tracing::warn!("{warning}");
            println!("  ! {warning}");
        }
    }

    Ok(())
}

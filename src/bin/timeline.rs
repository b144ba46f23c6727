//! 时间线回放
//!
//! 读取 JSON 时间线，在虚拟时钟上执行并逐行打印定时器触发记录。

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use timesim_rs::logging::init_tracing;
use timesim_rs::timeline::{TimelineSpec, run_timeline};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "timeline", about = "在虚拟时钟上回放定时器时间线")]
struct Args {
    /// 时间线 JSON 文件
    #[arg(long)]
    timeline: PathBuf,
    /// 把触发记录写成 JSON 数组
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let spec = match TimelineSpec::from_path(&args.timeline) {
        Ok(spec) => spec,
        Err(e) => {
            error!(error = %e, "无法读取时间线");
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let run = match run_timeline(&spec) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    for f in &run.fired {
        println!(
            "fired label={} shot={} steady_ns={} wall_ns={}",
            f.label, f.shot, f.steady_ns, f.wall_ns
        );
    }

    if let Some(path) = &args.json_out {
        let out = match serde_json::to_string_pretty(&run.fired) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        };
        if let Err(e) = std::fs::write(path, out) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::from(2);
        }
    }

    match &run.failure {
        Some(e) => {
            println!(
                "failed steady_elapsed_ns={} error={e}",
                run.steady_elapsed.as_nanos()
            );
            ExitCode::FAILURE
        }
        None => {
            println!("done steady_elapsed_ns={}", run.steady_elapsed.as_nanos());
            ExitCode::SUCCESS
        }
    }
}

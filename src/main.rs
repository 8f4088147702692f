use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use simon_pose::config::Config;
use simon_pose::pose::{LandmarkAdapter, RecordedEstimator};
use simon_pose::render::Canvas;
use simon_pose::PoseComparator;

/// 保存済みの検出結果2つを比較して、ライブ姿勢が基準姿勢に一致するか判定する
#[derive(Parser, Debug)]
#[command(author, version = env!("SIMON_POSE_VERSION"), about, long_about = None)]
struct Args {
    /// 基準姿勢の検出結果 (JSON)
    reference: PathBuf,

    /// ライブ姿勢の検出結果 (JSON)
    live: PathBuf,

    /// 設定ファイル
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// 許容するずれ(%)。設定ファイルより優先
    #[arg(long)]
    threshold: Option<f64>,

    /// 一致に必要な正解部位数。設定ファイルより優先
    #[arg(long)]
    min_correct: Option<usize>,

    /// 判定結果を描画したPNGの出力先
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// 描画の背景にするライブ画像
    #[arg(long, requires = "annotate")]
    background: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config);
    if let Some(threshold) = args.threshold {
        config.comparison.threshold_percent = threshold;
    }
    if let Some(min_correct) = args.min_correct {
        config.comparison.min_correct_count = min_correct;
    }
    config.validate()?;

    let comparator = PoseComparator::from_config(&config.comparison)?;
    println!(
        "Threshold: {}%, min correct: {}/{}",
        comparator.threshold_percent(),
        comparator.min_correct_count(),
        comparator.parts().len()
    );

    let adapter = LandmarkAdapter::new(config.detector.clone());
    let mut estimator = RecordedEstimator;
    let reference = adapter
        .detect(&mut estimator, args.reference.as_path())
        .with_context(|| format!("Reference pose {}", args.reference.display()))?;
    let live = adapter
        .detect(&mut estimator, args.live.as_path())
        .with_context(|| format!("Live pose {}", args.live.display()))?;

    let outcome = comparator.compare(&reference, &live)?;

    println!();
    println!("{:<16} {:>10} {:>10} {:>10}", "part", "reference", "live", "deviation");
    for joint in &outcome.joints {
        println!(
            "{:<16} {:>9.1}° {:>9.1}° {:>9.1}%{}",
            joint.part.key(),
            joint.reference_angle,
            joint.live_angle,
            joint.deviation_percent,
            if joint.mismatched { "  ✗" } else { "" }
        );
    }
    println!();
    println!(
        "Correct: {}/{}",
        outcome.correct_count(),
        outcome.joints.len()
    );

    if let Some(out) = &args.annotate {
        let mut canvas = match &args.background {
            Some(path) => {
                let image = image::open(path)
                    .with_context(|| format!("Failed to open background {}", path.display()))?;
                Canvas::from_image(&image.to_rgb8())
            }
            None => {
                let detection = simon_pose::pose::load_detection(&args.live)?;
                Canvas::new(detection.width as usize, detection.height as usize)
            }
        };
        canvas.draw_landmarks(&live);
        canvas.draw_derived(&live, &config.annotate)?;
        canvas.draw_outcome(&live, &outcome)?;
        canvas.save(out)?;
        println!("Annotated: {}", out.display());
    }

    if outcome.matched {
        println!("User is in the correct position");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("User is not in the correct position");
        Ok(ExitCode::FAILURE)
    }
}

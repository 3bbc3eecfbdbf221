//! Display WAV file metadata.

use clap::Args;

use crate::wav::read_wav_info;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!("Bit Depth:   {}-bit", info.bits_per_sample);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    Ok(())
}

use ima2dcm::{Batch, Command, Error, RawArgs, USAGE, generate_config, init_logging};
use std::ffi::OsString;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(std::env::args_os().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}\n");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

fn run(tokens: impl Iterator<Item = OsString>) -> Result<(), Error> {
    let args = RawArgs::collect_os(tokens)?;
    init_logging(args.contains("verbose"));
    let cwd = std::env::current_dir().map_err(Error::WorkingDirectory)?;
    match Command::interpret(&args, &cwd)? {
        Command::Help => println!("{USAGE}"),
        Command::GenerateConfig(dir) => {
            let path = generate_config(&dir)?;
            println!("Wrote default configuration to {}", path.display());
        }
        Command::Convert(request) => {
            let batch = Batch::new(&request);
            tracing::info!(
                study = %batch.identity().study_instance_uid,
                series = %batch.identity().series_instance_uid,
                input = %request.input_dir.display(),
                "converting"
            );
            let converted = batch.run(|file| {
                println!(
                    "Converted {} -> {}",
                    file.source.display(),
                    file.destination.display()
                )
            })?;
            println!(
                "Done: {} file(s) written to {}",
                converted.len(),
                request.output_dir.display()
            );
        }
    }
    Ok(())
}

use std::io;
use std::process::ExitCode;

use vault_client::ContractFiles;
use vault_ui::setup;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let files = ContractFiles::from_env();
    match setup::check(&files, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

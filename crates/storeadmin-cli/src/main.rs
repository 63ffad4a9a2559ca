mod cli;

use storeadmin_core::api::ApiError;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}"); // pretty anyhow chain
        if let Some(fields) = e.downcast_ref::<ApiError>().and_then(ApiError::field_errors) {
            for (field, messages) in fields {
                for message in messages {
                    eprintln!("  {field}: {message}");
                }
            }
        }
        std::process::exit(1);
    }
}

use crate::logging::codes;
use crate::{log_debug, log_success};

/// Check the code registry and logging limits before any file is processed
pub fn validate_pipeline() -> Result<(), String> {
    log_debug!("Validating catalog pipeline configuration");

    for code in codes::required_codes() {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Code {} has no registered metadata", code));
        }
    }

    crate::logging::config::validate_config()?;

    log_success!(codes::success::SYSTEM_INITIALIZATION_COMPLETED, "Catalog pipeline validated",
        "required_codes" => codes::required_codes().len(),
        "config" => crate::config::build_info::source_info()
    );

    Ok(())
}

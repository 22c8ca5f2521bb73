use sha2::{Digest, Sha256};
use tcuplink_parse::{starts_with_device_id, TAG_SHA256};

use crate::cmd::SignArgs;
use crate::exit::{CliError, CliResult, DATA_INVALID, SUCCESS};

/// Compute the digest tag for a command and print the ready-to-send line.
///
/// The digest covers the device-id prefix through the closing paren,
/// inclusive — exactly the range the flight parser recomputes.
pub fn run(args: SignArgs) -> CliResult<i32> {
    let line = args
        .line
        .trim_end_matches(|c: char| c == '!' || c.is_whitespace());

    if !starts_with_device_id(line) {
        return Err(CliError::new(
            DATA_INVALID,
            "line must start with the device-id prefix",
        ));
    }
    let close_idx = line.find(')').ok_or_else(|| {
        CliError::new(DATA_INVALID, "line has no closing paren to sign through")
    })?;

    let digest = Sha256::digest(&line.as_bytes()[..=close_idx]);
    println!("{line}{TAG_SHA256}{}!", hex::encode(digest));
    Ok(SUCCESS)
}

//! Binary profile encoder, the inverse of [`decode`](super::decoder::decode).
//!
//! Writes the function table in ascending id order followed by the samples
//! in profile order. Names longer than `MAX_FUNC_NAME_LEN` bytes are cut.

use super::schema::{Profile, Sample};
use crate::utils::config::{HEADER_LEN, MAX_FUNC_NAME_LEN};
use crate::utils::error::FormatError;
use log::debug;

const SAMPLE_FIXED_LEN: usize = 20;

/// Encode a profile into the binary wire format
///
/// **Public** - used to produce fixtures and re-export profiles
///
/// # Errors
/// * `FormatError::CountOverflow` - function count or stack depth exceeds `u32::MAX`
/// * `FormatError::BodyTooLarge` - encoded body does not fit the length header
pub fn encode(profile: &Profile) -> Result<Vec<u8>, FormatError> {
    let function_count = to_u32(profile.functions.len(), "function")?;

    let mut body = Vec::with_capacity(estimate_body_len(profile));
    body.extend_from_slice(&function_count.to_be_bytes());

    for (id, name) in profile.functions.iter() {
        let name = truncate_name(name);
        // truncate_name caps the length well below u8::MAX
        body.push(name.len() as u8);
        body.extend_from_slice(name.as_bytes());
        body.extend_from_slice(&id.0.to_be_bytes());
    }

    for sample in &profile.samples {
        encode_sample(sample, &mut body)?;
    }

    let body_len = u32::try_from(body.len())
        .map_err(|_| FormatError::BodyTooLarge { len: body.len() })?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&body_len.to_be_bytes());
    out.extend_from_slice(&body);

    debug!(
        "Encoded {} functions and {} samples into {} bytes",
        profile.functions.len(),
        profile.samples.len(),
        out.len()
    );

    Ok(out)
}

fn encode_sample(sample: &Sample, out: &mut Vec<u8>) -> Result<(), FormatError> {
    let depth = to_u32(sample.depth(), "stack depth")?;
    for value in [
        sample.alloc_objects,
        sample.alloc_bytes,
        sample.free_objects,
        sample.free_bytes,
        depth,
    ] {
        out.extend_from_slice(&value.to_be_bytes());
    }
    for frame in &sample.stack {
        out.extend_from_slice(&frame.0.to_be_bytes());
    }
    Ok(())
}

/// Cut to at most `MAX_FUNC_NAME_LEN` bytes without splitting a character
fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_FUNC_NAME_LEN {
        return name;
    }
    let mut end = MAX_FUNC_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn to_u32(count: usize, what: &'static str) -> Result<u32, FormatError> {
    u32::try_from(count).map_err(|_| FormatError::CountOverflow { what, count })
}

fn estimate_body_len(profile: &Profile) -> usize {
    let functions: usize = profile
        .functions
        .iter()
        .map(|(_, name)| 1 + truncate_name(name).len() + 8)
        .sum();
    let samples: usize = profile
        .samples
        .iter()
        .map(|s| SAMPLE_FIXED_LEN + s.depth() * 8)
        .sum();
    4 + functions + samples
}

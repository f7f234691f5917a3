//! Binary profile decoder.
//!
//! Wire layout (big-endian throughout):
//!
//! ```text
//! u32 body_len
//! u32 function_count
//! function_count x { u8 name_len, name_len bytes, u64 id }
//! until end of buffer: { u32 alloc_objs, u32 alloc_bytes, u32 free_objs,
//!                        u32 free_bytes, u32 depth, depth x u64 id }
//! ```

use super::schema::{FunctionId, FunctionTable, Profile, Sample};
use crate::utils::config::HEADER_LEN;
use crate::utils::error::FormatError;
use log::{debug, warn};

/// Bounds-checked big-endian cursor over the input buffer
struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn take(&mut self, needed: usize, what: &'static str) -> Result<&'a [u8], FormatError> {
        if self.remaining() < needed {
            return Err(FormatError::Truncated {
                what,
                offset: self.offset,
                needed,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn read_u8(&mut self, what: &'static str) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    fn read_u32(&mut self, what: &'static str) -> Result<u32, FormatError> {
        self.read_array(what).map(u32::from_be_bytes)
    }

    fn read_u64(&mut self, what: &'static str) -> Result<u64, FormatError> {
        self.read_array(what).map(u64::from_be_bytes)
    }
}

/// Decode a profile from its binary representation
///
/// **Public** - main entry point for decoding
///
/// # Errors
/// * `FormatError::HeaderTooShort` - fewer than 4 bytes
/// * `FormatError::LengthMismatch` - buffer length disagrees with the header
/// * `FormatError::Truncated` - a function or sample record runs past the end
pub fn decode(data: &[u8]) -> Result<Profile, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::HeaderTooShort { len: data.len() });
    }

    let mut reader = ByteReader::new(data, 0);
    let declared = reader.read_u32("header")?;
    let actual = data.len() - HEADER_LEN;
    if u64::from(declared) != actual as u64 {
        return Err(FormatError::LengthMismatch { declared, actual });
    }

    debug!("Decoding profile body of {} bytes", actual);

    let mut profile = Profile::default();
    if reader.is_at_end() {
        return Ok(profile);
    }

    profile.functions = decode_function_table(&mut reader)?;
    while !reader.is_at_end() {
        profile.samples.push(decode_sample(&mut reader)?);
    }

    debug!(
        "Decoded {} functions and {} samples",
        profile.functions.len(),
        profile.samples.len()
    );

    let unresolved = profile.unresolved_ids();
    if !unresolved.is_empty() {
        warn!(
            "{} function ids referenced by samples are missing from the function table",
            unresolved.len()
        );
    }

    Ok(profile)
}

fn decode_function_table(reader: &mut ByteReader<'_>) -> Result<FunctionTable, FormatError> {
    let count = reader.read_u32("function count")?;
    let mut table = FunctionTable::new();

    for _ in 0..count {
        let name_len = reader.read_u8("function name length")? as usize;
        let name = reader.take(name_len, "function name")?;
        let id = reader.read_u64("function id")?;
        table.insert(FunctionId(id), String::from_utf8_lossy(name).into_owned());
    }

    if table.len() != count as usize {
        warn!(
            "Function table declared {} entries but only {} have distinct ids",
            count,
            table.len()
        );
    }

    Ok(table)
}

fn decode_sample(reader: &mut ByteReader<'_>) -> Result<Sample, FormatError> {
    let alloc_objects = reader.read_u32("sample alloc objects")?;
    let alloc_bytes = reader.read_u32("sample alloc bytes")?;
    let free_objects = reader.read_u32("sample free objects")?;
    let free_bytes = reader.read_u32("sample free bytes")?;
    let depth = reader.read_u32("sample depth")? as usize;

    // Validate the whole stack up front so a bogus depth cannot drive a huge allocation
    let needed = depth.saturating_mul(8);
    if reader.remaining() < needed {
        return Err(FormatError::Truncated {
            what: "sample stack",
            offset: reader.offset,
            needed,
            remaining: reader.remaining(),
        });
    }

    let mut stack = Vec::with_capacity(depth);
    for _ in 0..depth {
        stack.push(FunctionId(reader.read_u64("stack frame")?));
    }

    Ok(Sample {
        alloc_objects,
        alloc_bytes,
        free_objects,
        free_bytes,
        stack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(body: &[u8]) -> Vec<u8> {
        let mut data = (body.len() as u32).to_be_bytes().to_vec();
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_header_too_short() {
        assert_eq!(
            decode(&[0, 0, 1]),
            Err(FormatError::HeaderTooShort { len: 3 })
        );
    }

    #[test]
    fn test_length_mismatch() {
        let data = [0, 0, 0, 9, 0, 0, 0, 0];
        assert_eq!(
            decode(&data),
            Err(FormatError::LengthMismatch {
                declared: 9,
                actual: 4
            })
        );
    }

    #[test]
    fn test_empty_body_decodes_to_empty_profile() {
        let profile = decode(&[0, 0, 0, 0]).unwrap();
        assert!(profile.functions.is_empty());
        assert!(profile.samples.is_empty());
    }

    #[test]
    fn test_truncated_function_count() {
        let data = with_header(&[0, 0]);
        assert!(matches!(
            decode(&data),
            Err(FormatError::Truncated {
                what: "function count",
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_function_name() {
        let mut body = 1u32.to_be_bytes().to_vec();
        body.push(10);
        body.extend_from_slice(b"abc");
        let data = with_header(&body);
        assert!(matches!(
            decode(&data),
            Err(FormatError::Truncated {
                what: "function name",
                needed: 10,
                remaining: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_huge_depth_is_rejected_before_allocating() {
        let mut body = 0u32.to_be_bytes().to_vec();
        for v in [1u32, 16, 0, 0, u32::MAX] {
            body.extend_from_slice(&v.to_be_bytes());
        }
        let data = with_header(&body);
        assert!(matches!(
            decode(&data),
            Err(FormatError::Truncated {
                what: "sample stack",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_single_sample() {
        let mut body = 1u32.to_be_bytes().to_vec();
        body.push(4);
        body.extend_from_slice(b"main");
        body.extend_from_slice(&42u64.to_be_bytes());
        for v in [2u32, 64, 1, 32, 1] {
            body.extend_from_slice(&v.to_be_bytes());
        }
        body.extend_from_slice(&42u64.to_be_bytes());

        let profile = decode(&with_header(&body)).unwrap();
        assert_eq!(profile.functions.name_of(FunctionId(42)), Some("main"));
        assert_eq!(
            profile.samples,
            vec![Sample::new(2, 64, 1, 32, vec![FunctionId(42)])]
        );
    }
}

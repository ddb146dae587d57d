use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as Base64, Engine};

pub mod multipart;

pub fn base64_encode<T: AsRef<[u8]>>(bytes: T) -> String {
	Base64.encode(bytes)
}

#[cfg(test)]
pub fn base64_decode<T: AsRef<[u8]>>(bytes: T) -> Result<Vec<u8>, base64::DecodeError> {
	Base64.decode(bytes)
}

pub fn with_timing<T>(cb: impl FnOnce() -> T) -> (T, Duration) {
	let start = Instant::now();
	let result = cb();

	(result, start.elapsed())
}

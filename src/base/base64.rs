#[inline]
pub(crate) fn standard(data: &[u8]) -> String {
    ::base64::encode(data)
}

#[inline]
#[cfg(test)]
pub(crate) fn decode_standard(data: impl AsRef<[u8]>) -> Result<Vec<u8>, ::base64::DecodeError> {
    ::base64::decode(data)
}

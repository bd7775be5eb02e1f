// Base64 encoder for the upload path.
//
// The API carries image bytes inside a JSON string, so the client encodes
// the staged frame with standard base64 (RFC 4648 alphabet, `=` padding).
// Only the encode direction exists here: the client never receives base64,
// downloads are raw byte streams. Tests round-trip through the `base64`
// crate's decoder to check against an independent implementation.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode arbitrary bytes as base64 text.
///
/// Total over every input, including empty slices. The output is always
/// exactly `4 * ceil(n / 3)` characters: each 3-byte block becomes four
/// 6-bit symbols, a short final block is zero-padded before extraction and
/// its surplus symbols are then overwritten with `=`.
pub fn encode(data: &[u8]) -> String {
    let out_len = 4 * data.len().div_ceil(3);
    let mut out = Vec::with_capacity(out_len);

    for chunk in data.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = u32::from(chunk.get(1).copied().unwrap_or(0));
        let b2 = u32::from(chunk.get(2).copied().unwrap_or(0));
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(ALPHABET[(triple >> 18) as usize & 0x3f]);
        out.push(ALPHABET[(triple >> 12) as usize & 0x3f]);
        out.push(ALPHABET[(triple >> 6) as usize & 0x3f]);
        out.push(ALPHABET[triple as usize & 0x3f]);
    }

    match data.len() % 3 {
        1 => {
            out[out_len - 1] = b'=';
            out[out_len - 2] = b'=';
        }
        2 => out[out_len - 1] = b'=',
        _ => {}
    }

    // every byte pushed above comes from the ASCII alphabet table or is '='
    String::from_utf8(out).expect("base64 output is ASCII")
}

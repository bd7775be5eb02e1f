// Library root
// -----------
// Client library for the surveillance-frame storage API. The binary
// (`main.rs`) is a thin shell over these modules.
//
// Module responsibilities:
// - `encoding`: base64 encoder for the upload payload.
// - `timefmt`: epoch-millisecond timestamps and the `yyMMddhhmmss_mmm.bmp`
//   filename contract.
// - `envelope`: the wire shapes (upload JSON body, lookup query string,
//   lookup response parsing).
// - `api`: the blocking `FrameClient` with the three operations (upload,
//   query, download) and the fixed-capacity `ImageBuffer`.
// - `error`: the `FrameError` taxonomy shared by all of the above.
// - `cli`: clap argument surface and command dispatch.
//
// Keeping the wire logic in the library makes the protocol code testable
// without a running backend.
pub mod api;
pub mod cli;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod timefmt;

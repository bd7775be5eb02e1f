// Wire envelope for the frame API.
//
// Three fixed shapes, nothing general-purpose:
// - upload body: JSON `{camNo, timestamp, filename, imageBase64}`
// - query: URL query string `camNo=..&year=..&...` with optional filters
// - query response: JSON `{"frames": [{.., "l_location": <path>}, ..]}`
//
// Field names mirror the backend exactly (see the serde renames); the Rust
// side keeps snake_case.

use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::error::{FrameError, Result};
use crate::timefmt;

/// Longest camera identifier the wire format carries.
pub const MAX_CAMERA_LEN: usize = 7;

/// Metadata for one frame at upload time. Built from the local clock right
/// before the request and discarded when the request completes.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub cam_no: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
    /// Epoch milliseconds captured at the same instant as the fields above.
    pub timestamp_millis: i64,
    /// Server-assigned storage location, if known.
    pub location: Option<String>,
}

impl FrameInfo {
    /// Build frame metadata for `camera` from the current local time.
    ///
    /// Rejects camera ids longer than [`MAX_CAMERA_LEN`] instead of cutting
    /// them off; a silently shortened id would query as a different camera.
    pub fn from_now(camera: &str) -> Result<Self> {
        if camera.len() > MAX_CAMERA_LEN {
            return Err(FrameError::CameraTooLong {
                id: camera.to_string(),
                max: MAX_CAMERA_LEN,
            });
        }
        let now = Local::now();
        Ok(FrameInfo {
            cam_no: camera.to_string(),
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            millis: now.timestamp_subsec_millis(),
            timestamp_millis: now.timestamp_millis(),
            location: None,
        })
    }
}

/// Query filters for `GET /api/frames`. `camera` is required; the rest are
/// sentinel-typed optionals matching the backend contract:
///
/// - date fields (`year`, `month`, `day`): `0` means "not specified"
/// - time fields (`hour`, `minute`, `second`): negative means "not
///   specified", because `0` is a valid hour/minute/second
///
/// The asymmetry is deliberate and load-bearing: it is the only way to ask
/// for midnight (`hour = 0`) without dropping the hour filter.
#[derive(Debug, Clone)]
pub struct QueryFilter {
    pub camera: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl QueryFilter {
    /// Filter on camera only, all other filters absent.
    pub fn new(camera: impl Into<String>) -> Self {
        QueryFilter {
            camera: camera.into(),
            year: 0,
            month: 0,
            day: 0,
            hour: -1,
            minute: -1,
            second: -1,
        }
    }
}

/// Outbound upload body. Serde serialises fields in declaration order, which
/// keeps the JSON stable for debugging and tests.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadBody {
    #[serde(rename = "camNo")]
    pub cam_no: String,
    pub timestamp: i64,
    pub filename: String,
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    frames: Option<Vec<FrameRecord>>,
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(rename = "l_location")]
    location: Option<String>,
}

/// Build the JSON body for an upload and the filename it registers.
///
/// Encodes `image` as base64, derives the filename from the capture
/// timestamp in `info`, and serialises the four-field body. Serialisation
/// failure surfaces as [`FrameError::EnvelopeBuild`], distinct from any
/// transport failure.
pub fn build_upload_request(info: &FrameInfo, image: &[u8]) -> Result<(String, String)> {
    let filename = timefmt::filename_for(info.timestamp_millis)?;
    let body = UploadBody {
        cam_no: info.cam_no.clone(),
        timestamp: info.timestamp_millis,
        filename: filename.clone(),
        image_base64: encoding::encode(image),
    };
    let json = serde_json::to_string(&body).map_err(FrameError::EnvelopeBuild)?;
    Ok((json, filename))
}

/// Build the query string for a frame lookup.
///
/// Always starts with `camNo=<id>`; present filters follow in the fixed
/// order year, month, day, hour, minute, second so query strings stay
/// stable regardless of which subset is set.
pub fn build_query_string(filter: &QueryFilter) -> String {
    let mut query = format!("camNo={}", filter.camera);
    if filter.year > 0 {
        query.push_str(&format!("&year={}", filter.year));
    }
    if filter.month > 0 {
        query.push_str(&format!("&month={}", filter.month));
    }
    if filter.day > 0 {
        query.push_str(&format!("&day={}", filter.day));
    }
    if filter.hour >= 0 {
        query.push_str(&format!("&hour={}", filter.hour));
    }
    if filter.minute >= 0 {
        query.push_str(&format!("&minute={}", filter.minute));
    }
    if filter.second >= 0 {
        query.push_str(&format!("&second={}", filter.second));
    }
    query
}

/// Extract the downloadable filename from a query response body.
///
/// Requires a `frames` array with at least one element and reads the first
/// element's `l_location`; the returned name is the basename (text after
/// the final `/`, or the whole value when there is no separator). Each
/// failure shape keeps its own variant so callers can tell "nothing
/// matched" from "the server sent garbage".
pub fn parse_query_response(body: &str) -> Result<String> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(FrameError::MalformedResponse)?;
    let frames = response.frames.ok_or(FrameError::MissingFrames)?;
    let first = frames.first().ok_or(FrameError::NoMatch)?;
    let location = first
        .location
        .as_deref()
        .filter(|loc| !loc.is_empty())
        .ok_or(FrameError::MissingLocation)?;
    let basename = location.rsplit('/').next().unwrap_or(location);
    if basename.is_empty() {
        // location ended in '/', e.g. "/data/frames/"
        return Err(FrameError::MissingLocation);
    }
    Ok(basename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::Value;

    fn info_for(camera: &str) -> FrameInfo {
        FrameInfo::from_now(camera).unwrap()
    }

    #[test]
    fn upload_body_has_exactly_four_keys() {
        let (json, _) = build_upload_request(&info_for("CAM0"), b"0123456789").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        for key in ["camNo", "timestamp", "filename", "imageBase64"] {
            assert!(object.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn upload_body_round_trips_image_and_recent_timestamp() {
        let image = b"0123456789";
        let (json, filename) = build_upload_request(&info_for("CAM0"), image).unwrap();
        let body: UploadBody = serde_json::from_str(&json).unwrap();

        assert_eq!(body.cam_no, "CAM0");
        assert_eq!(body.filename, filename);
        assert_eq!(STANDARD.decode(&body.image_base64).unwrap(), image);

        let now = timefmt::now_timestamp_millis();
        assert!((now - body.timestamp).abs() < 5_000);
    }

    #[test]
    fn upload_filename_matches_wire_pattern() {
        let (_, filename) = build_upload_request(&info_for("CAM1"), b"x").unwrap();
        assert_eq!(filename.len(), 20);
        assert!(filename.ends_with(".bmp"));
        assert_eq!(&filename[12..13], "_");
    }

    #[test]
    fn camera_id_longer_than_wire_field_is_rejected() {
        assert!(matches!(
            FrameInfo::from_now("CAMERA-0"),
            Err(FrameError::CameraTooLong { .. })
        ));
        assert!(FrameInfo::from_now("CAM0007").is_ok());
    }

    #[test]
    fn query_string_with_no_filters_is_camera_only() {
        let filter = QueryFilter::new("CAM0");
        assert_eq!(build_query_string(&filter), "camNo=CAM0");
    }

    #[test]
    fn query_string_appends_all_filters_in_fixed_order() {
        let filter = QueryFilter {
            camera: "CAM0".into(),
            year: 2025,
            month: 11,
            day: 10,
            hour: 12,
            minute: 34,
            second: 56,
        };
        assert_eq!(
            build_query_string(&filter),
            "camNo=CAM0&year=2025&month=11&day=10&hour=12&minute=34&second=56"
        );
    }

    #[test]
    fn midnight_hour_is_present_while_zero_date_fields_are_absent() {
        // hour=0 is a real filter (midnight); year/month/day 0 mean absent.
        let mut filter = QueryFilter::new("CAM0");
        filter.year = 2025;
        filter.hour = 0;
        assert_eq!(build_query_string(&filter), "camNo=CAM0&year=2025&hour=0");
    }

    #[test]
    fn negative_time_fields_are_absent() {
        let mut filter = QueryFilter::new("CAM9");
        filter.day = 10;
        assert_eq!(build_query_string(&filter), "camNo=CAM9&day=10");
    }

    #[test]
    fn response_location_is_reduced_to_basename() {
        let body = r#"{"frames":[{"l_location":"/data/frames/abc.bmp"}]}"#;
        assert_eq!(parse_query_response(body).unwrap(), "abc.bmp");
    }

    #[test]
    fn response_location_without_separator_is_used_whole() {
        let body = r#"{"frames":[{"l_location":"abc.bmp"}]}"#;
        assert_eq!(parse_query_response(body).unwrap(), "abc.bmp");
    }

    #[test]
    fn only_first_frame_record_is_read() {
        let body = r#"{"frames":[{"l_location":"/a/first.bmp"},{"l_location":"/a/second.bmp"}]}"#;
        assert_eq!(parse_query_response(body).unwrap(), "first.bmp");
    }

    #[test]
    fn empty_frames_is_no_match_not_a_parse_failure() {
        assert!(matches!(
            parse_query_response(r#"{"frames":[]}"#),
            Err(FrameError::NoMatch)
        ));
    }

    #[test]
    fn missing_frames_field_is_its_own_failure() {
        assert!(matches!(
            parse_query_response(r#"{"count":0}"#),
            Err(FrameError::MissingFrames)
        ));
    }

    #[test]
    fn non_json_body_is_a_parse_failure() {
        assert!(matches!(
            parse_query_response("not json"),
            Err(FrameError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_or_empty_location_is_reported() {
        assert!(matches!(
            parse_query_response(r#"{"frames":[{"id":7}]}"#),
            Err(FrameError::MissingLocation)
        ));
        assert!(matches!(
            parse_query_response(r#"{"frames":[{"l_location":""}]}"#),
            Err(FrameError::MissingLocation)
        ));
        assert!(matches!(
            parse_query_response(r#"{"frames":[{"l_location":"/data/frames/"}]}"#),
            Err(FrameError::MissingLocation)
        ));
    }
}

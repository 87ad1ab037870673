//! Caption-track discovery and decoding.
//!
//! The watch page embeds a player response JSON blob; the `captionTracks`
//! array inside it lists the available tracks with their download URLs.
//! Tracks are fetched in `json3` format, a flat event list with millisecond
//! timing and UTF-8 segments.

use anyhow::Context;
use serde::Deserialize;

use super::CaptionFragment;
use crate::Result;

const TRACKS_MARKER: &str = "\"captionTracks\":";

/// One entry of the player response's `captionTracks` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,

    pub language_code: String,

    /// "asr" marks an auto-generated track
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub vss_id: Option<String>,
}

impl CaptionTrack {
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Locate and parse the `captionTracks` array embedded in a watch page.
pub fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>> {
    let start = html.find(TRACKS_MARKER).ok_or_else(|| {
        anyhow::anyhow!("No caption tracks in the player response (subtitles may be disabled)")
    })?;

    let array = slice_json_array(&html[start + TRACKS_MARKER.len()..])
        .context("Malformed caption track list")?;

    let tracks: Vec<CaptionTrack> =
        serde_json::from_str(array).context("Failed to parse caption track list")?;

    if tracks.is_empty() {
        anyhow::bail!("Caption track list is empty");
    }

    Ok(tracks)
}

/// Slice the leading JSON array out of `input`, which starts at (or just
/// before) a `[`. String-aware bracket matching; the surrounding page is not
/// valid JSON so serde cannot do this for us.
fn slice_json_array(input: &str) -> Result<&str> {
    let open = input
        .find('[')
        .ok_or_else(|| anyhow::anyhow!("Expected a JSON array"))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in input[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&input[open..open + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    anyhow::bail!("Unterminated JSON array")
}

/// Pick a caption track, preferring requested languages and manually
/// authored tracks over auto-generated ones. Falls back to the first track.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    for lang in languages {
        if let Some(track) = tracks
            .iter()
            .find(|t| t.language_code == *lang && !t.is_auto_generated())
        {
            return Some(track);
        }
        if let Some(track) = tracks.iter().find(|t| t.language_code == *lang) {
            return Some(track);
        }
        // Regional variants (en-US for a requested "en")
        if let Some(track) = tracks
            .iter()
            .find(|t| t.language_code.starts_with(&format!("{}-", lang)))
        {
            return Some(track);
        }
    }

    tracks.first()
}

#[derive(Debug, Deserialize)]
struct Json3Transcript {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: Option<u64>,

    #[serde(default)]
    d_duration_ms: Option<u64>,

    #[serde(default)]
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Decode a `json3` caption document into ordered fragments.
///
/// Events without text segments (window metadata) are skipped; newlines
/// inside segments are collapsed to single spaces.
pub fn parse_json3(raw: &str) -> Result<Vec<CaptionFragment>> {
    let parsed: Json3Transcript =
        serde_json::from_str(raw).context("Failed to parse caption data")?;

    let mut fragments = Vec::new();
    for event in parsed.events {
        let Some(segs) = event.segs else { continue };

        let text = segs.iter().map(|s| s.utf8.as_str()).collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }

        fragments.push(CaptionFragment {
            text,
            start: event.t_start_ms.unwrap_or(0) as f64 / 1000.0,
            duration: event.d_duration_ms.unwrap_or(0) as f64 / 1000.0,
        });
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_SNIPPET: &str = r#"...,"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc123&lang=en","name":{"simpleText":"English"},"vssId":".en","languageCode":"en","isTranslatable":true},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc123&lang=de&kind=asr","name":{"simpleText":"German (auto-generated)"},"vssId":"a.de","languageCode":"de","kind":"asr"}],"audioTracks":[...]"#;

    #[test]
    fn test_extract_caption_tracks() {
        let tracks = extract_caption_tracks(PAGE_SNIPPET).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "en");
        assert!(!tracks[0].is_auto_generated());
        assert_eq!(tracks[1].language_code, "de");
        assert!(tracks[1].is_auto_generated());
    }

    #[test]
    fn test_extract_without_marker() {
        let err = extract_caption_tracks("<html>no captions here</html>").unwrap_err();
        assert!(err.to_string().contains("subtitles may be disabled"));
    }

    #[test]
    fn test_slice_json_array_handles_nested_brackets_and_strings() {
        let input = r#"[{"a":"tricky ] value","b":[1,2]},{"c":"\""}] trailing"#;
        assert_eq!(
            slice_json_array(input).unwrap(),
            r#"[{"a":"tricky ] value","b":[1,2]},{"c":"\""}]"#
        );
    }

    #[test]
    fn test_slice_json_array_unterminated() {
        assert!(slice_json_array(r#"[{"a":1}"#).is_err());
    }

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.invalid/{}", lang),
            language_code: lang.to_string(),
            kind: kind.map(|k| k.to_string()),
            vss_id: None,
        }
    }

    #[test]
    fn test_select_prefers_manual_track_in_requested_language() {
        let tracks = vec![track("en", Some("asr")), track("en", None)];
        let selected = select_track(&tracks, &["en".to_string()]).unwrap();
        assert!(!selected.is_auto_generated());
    }

    #[test]
    fn test_select_falls_back_to_auto_generated() {
        let tracks = vec![track("en", Some("asr"))];
        let selected = select_track(&tracks, &["en".to_string()]).unwrap();
        assert!(selected.is_auto_generated());
    }

    #[test]
    fn test_select_matches_regional_variant() {
        let tracks = vec![track("en-US", None)];
        let selected = select_track(&tracks, &["en".to_string()]).unwrap();
        assert_eq!(selected.language_code, "en-US");
    }

    #[test]
    fn test_select_falls_back_to_first_track() {
        let tracks = vec![track("fr", None), track("de", None)];
        let selected = select_track(&tracks, &["en".to_string()]).unwrap();
        assert_eq!(selected.language_code, "fr");
    }

    #[test]
    fn test_select_on_empty_list() {
        assert!(select_track(&[], &["en".to_string()]).is_none());
    }

    #[test]
    fn test_parse_json3() {
        let raw = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "hello"}]},
                {"tStartMs": 1000, "wWinId": 1},
                {"tStartMs": 2000, "dDurationMs": 1500, "segs": [{"utf8": "world"}]}
            ]
        }"#;

        let fragments = parse_json3(raw).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "hello");
        assert_eq!(fragments[0].start, 0.0);
        assert_eq!(fragments[0].duration, 2.0);
        assert_eq!(fragments[1].text, "world");
        assert_eq!(fragments[1].start, 2.0);
    }

    #[test]
    fn test_parse_json3_collapses_newlines() {
        let raw = r#"{"events":[{"tStartMs":0,"dDurationMs":1000,"segs":[{"utf8":"one\n"},{"utf8":"two"}]}]}"#;
        let fragments = parse_json3(raw).unwrap();
        assert_eq!(fragments[0].text, "one two");
    }

    #[test]
    fn test_parse_json3_skips_empty_events() {
        let raw = r#"{"events":[{"tStartMs":0,"segs":[{"utf8":"\n"}]}]}"#;
        assert!(parse_json3(raw).unwrap().is_empty());
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        assert!(parse_json3("<html>").is_err());
    }
}

//! Typed view of the CYBERBOARD firmware JSON document.
//!
//! The document is deserialized into the structures below. Fields the merge
//! workflow never touches (product metadata, non-LED page contents, vendor
//! extensions) are preserved losslessly through `#[serde(flatten)]` maps, so
//! a load/save round-trip reproduces everything except the fields the merge
//! deliberately rewrites (`frame_index`, `frame_num`, `page_index`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CUSTOM_LED_START_PAGE, CUSTOM_LED_SLOTS, FRAME_RGB_LEN, PAGE_COUNT};

/// One still image of an LED animation: 200 ordered color values
/// (`#RRGGBB` or a non-color sentinel token).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Frame {
    /// Zero-based position of this frame within its page.
    #[serde(default)]
    pub frame_index: u32,

    /// Color values for the 40x5 grid, row-major.
    #[serde(rename = "frame_RGB", default)]
    pub frame_rgb: Vec<String>,

    /// Unrecognized frame fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A frame list with its validity flag and declared count.
///
/// Pages carry two of these under the mutually exclusive keys `frames` and
/// `keyframes`; whichever has `valid == 1` is authoritative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FrameSet {
    #[serde(default)]
    pub valid: u8,

    /// Declared frame count; rewritten by the merger to match `frame_data`.
    #[serde(default)]
    pub frame_num: u32,

    #[serde(default)]
    pub frame_data: Vec<Frame>,

    /// Unrecognized fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FrameSet {
    /// Whether this frame set is marked authoritative.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid == 1
    }
}

/// One of the eight pages of a configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    #[serde(default)]
    pub page_index: u32,

    #[serde(default)]
    pub valid: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<FrameSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<FrameSet>,

    /// Non-LED page contents (battery, mosaic, clock, ...), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// The authoritative frame set: `frames` when its `valid == 1`, else
    /// `keyframes` when valid, else none.
    pub fn active_frames(&self) -> Option<&FrameSet> {
        match (&self.frames, &self.keyframes) {
            (Some(f), _) if f.is_valid() => Some(f),
            (_, Some(k)) if k.is_valid() => Some(k),
            _ => None,
        }
    }

    /// Ordered frames of the authoritative set; empty when neither set is valid.
    pub fn frames(&self) -> &[Frame] {
        self.active_frames()
            .map(|set| set.frame_data.as_slice())
            .unwrap_or(&[])
    }

    /// Number of usable frames on this page.
    pub fn frame_count(&self) -> usize {
        self.frames().len()
    }

    /// RGB arrays of frames whose `frame_RGB` has exactly [`FRAME_RGB_LEN`]
    /// entries. Malformed frames are dropped from preview/merge rather than
    /// erroring.
    pub fn rgb_data(&self) -> Vec<Vec<String>> {
        self.frames()
            .iter()
            .filter(|frame| frame.frame_rgb.len() == FRAME_RGB_LEN)
            .map(|frame| frame.frame_rgb.clone())
            .collect()
    }

    /// Stamp this page's declared index.
    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index as u32;
    }
}

/// The root firmware configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Configuration {
    /// Opaque product metadata; only inspected for `product_id` presence.
    #[serde(default)]
    pub product_info: Value,

    /// Declared page count; must equal [`PAGE_COUNT`].
    #[serde(default = "default_page_num")]
    pub page_num: u32,

    /// The ordered pages. Pages 0-4 are fixed-purpose, 5-7 are the custom
    /// LED slots.
    #[serde(default)]
    pub page_data: Vec<Page>,

    /// Unrecognized root fields, passed through unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_page_num() -> u32 {
    PAGE_COUNT as u32
}

impl Configuration {
    /// Number of pages actually present.
    pub fn page_count(&self) -> usize {
        self.page_data.len()
    }

    /// Page at `index`, or `None` when out of range. Never panics.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.page_data.get(index)
    }

    /// The three custom LED pages (indices 5, 6, 7) in that fixed order.
    pub fn custom_led_pages(&self) -> Vec<&Page> {
        (CUSTOM_LED_START_PAGE..CUSTOM_LED_START_PAGE + CUSTOM_LED_SLOTS)
            .filter_map(|i| self.page(i))
            .collect()
    }

    /// Frame counts of the three custom LED slots.
    pub fn custom_led_frame_counts(&self) -> Vec<usize> {
        self.custom_led_pages()
            .iter()
            .map(|page| page.frame_count())
            .collect()
    }

    /// Write `page` into the document at `index`, stamping the page's
    /// `page_index` to match. Callers must not trust the page's prior index
    /// after this call.
    ///
    /// Out-of-range writes are a contract breach and panic.
    pub fn set_page(&mut self, index: usize, mut page: Page) {
        assert!(
            index < self.page_data.len(),
            "page index {index} out of range (document has {} pages)",
            self.page_data.len()
        );
        page.set_page_index(index);
        self.page_data[index] = page;
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use serde_json::json;

    #[test]
    fn frames_prefers_valid_frames_key() {
        let page: Page = serde_json::from_value(json!({
            "page_index": 5,
            "valid": 1,
            "frames": { "valid": 1, "frame_num": 1,
                        "frame_data": [fixtures::frame_value(0, "#112233")] },
            "keyframes": { "valid": 1, "frame_num": 1,
                           "frame_data": [fixtures::frame_value(0, "#445566")] },
        }))
        .unwrap();

        assert_eq!(page.frame_count(), 1);
        assert_eq!(page.frames()[0].frame_rgb[0], "#112233");
    }

    #[test]
    fn frames_falls_back_to_valid_keyframes() {
        let page: Page = serde_json::from_value(json!({
            "page_index": 5,
            "valid": 1,
            "frames": { "valid": 0, "frame_num": 0, "frame_data": [] },
            "keyframes": { "valid": 1, "frame_num": 2,
                           "frame_data": [fixtures::frame_value(0, "#445566"),
                                          fixtures::frame_value(1, "#778899")] },
        }))
        .unwrap();

        assert_eq!(page.frame_count(), 2);
        assert_eq!(page.frames()[1].frame_rgb[0], "#778899");
    }

    #[test]
    fn frames_empty_when_neither_set_is_valid() {
        let page: Page = serde_json::from_value(json!({
            "page_index": 5,
            "valid": 0,
            "frames": { "valid": 0, "frame_num": 1,
                        "frame_data": [fixtures::frame_value(0, "#112233")] },
        }))
        .unwrap();

        assert!(page.frames().is_empty());
        assert!(page.active_frames().is_none());
    }

    #[test]
    fn rgb_data_drops_malformed_frames() {
        let mut page = fixtures::custom_page(5, &["#112233", "#445566"]);
        // Truncate the second frame below the 200-entry grid size.
        page.frames.as_mut().unwrap().frame_data[1]
            .frame_rgb
            .truncate(199);

        let rgb = page.rgb_data();
        assert_eq!(rgb.len(), 1);
        assert_eq!(rgb[0].len(), FRAME_RGB_LEN);
        assert_eq!(rgb[0][0], "#112233");
    }

    #[test]
    fn page_lookup_is_total() {
        let config = fixtures::configuration([1, 1, 1]);
        assert!(config.page(0).is_some());
        assert!(config.page(7).is_some());
        assert!(config.page(8).is_none());
        assert!(config.page(100).is_none());
    }

    #[test]
    fn custom_led_pages_in_fixed_order() {
        let config = fixtures::configuration([1, 2, 3]);
        let pages = config.custom_led_pages();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_index, 5);
        assert_eq!(pages[1].page_index, 6);
        assert_eq!(pages[2].page_index, 7);
        assert_eq!(config.custom_led_frame_counts(), vec![1, 2, 3]);
    }

    #[test]
    fn set_page_stamps_index() {
        let mut config = fixtures::configuration([1, 1, 1]);
        let mut page = fixtures::custom_page(0, &["#ABCDEF"]);
        page.page_index = 99;
        config.set_page(6, page);

        let written = config.page(6).unwrap();
        assert_eq!(written.page_index, 6);
        assert_eq!(written.frames()[0].frame_rgb[0], "#ABCDEF");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_page_out_of_range_is_a_contract_breach() {
        let mut config = fixtures::configuration([1, 1, 1]);
        config.set_page(8, Page::default());
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let original = json!({
            "product_info": { "product_id": "CB-R4", "firmware": "1.2.3" },
            "page_num": 8,
            "page_data": (0..8).map(|i| json!({
                "page_index": i,
                "valid": 1,
                "word_page": { "text": "hello" },
            })).collect::<Vec<_>>(),
            "tail_data": [1, 2, 3],
        });

        let config: Configuration = serde_json::from_value(original.clone()).unwrap();
        let reserialized = serde_json::to_value(&config).unwrap();
        assert_eq!(reserialized, original);
    }
}

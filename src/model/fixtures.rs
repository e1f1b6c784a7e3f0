//! Shared test fixtures: well-formed documents, pages, and frames.

use serde_json::{Value, json};

use super::{CUSTOM_LED_START_PAGE, FRAME_RGB_LEN, PAGE_COUNT};
use super::{Configuration, Page};

/// A frame as raw JSON: 200 copies of `color` at position `index`.
pub fn frame_value(index: usize, color: &str) -> Value {
    json!({
        "frame_index": index,
        "frame_RGB": vec![color.to_string(); FRAME_RGB_LEN],
    })
}

/// A custom-LED page with one solid-color frame per entry of `colors`,
/// stored under a valid `frames` set.
pub fn custom_page(page_index: usize, colors: &[&str]) -> Page {
    serde_json::from_value(json!({
        "page_index": page_index,
        "valid": 1,
        "frames": {
            "valid": 1,
            "frame_num": colors.len(),
            "frame_data": colors
                .iter()
                .enumerate()
                .map(|(i, c)| frame_value(i, c))
                .collect::<Vec<_>>(),
        },
    }))
    .expect("fixture page must deserialize")
}

/// A structurally valid eight-page document whose custom LED slots carry
/// `frames_per_slot` solid-color frames each.
pub fn configuration(frames_per_slot: [usize; 3]) -> Configuration {
    let mut pages = Vec::with_capacity(PAGE_COUNT);
    for i in 0..CUSTOM_LED_START_PAGE {
        pages.push(json!({ "page_index": i, "valid": 1 }));
    }
    for (slot, count) in frames_per_slot.iter().enumerate() {
        let index = CUSTOM_LED_START_PAGE + slot;
        let colors: Vec<String> = (0..*count).map(|_| "#102030".to_string()).collect();
        let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
        pages.push(serde_json::to_value(custom_page(index, &refs)).expect("fixture page"));
    }

    serde_json::from_value(json!({
        "product_info": { "product_id": "CB-R4" },
        "page_num": PAGE_COUNT,
        "page_data": pages,
    }))
    .expect("fixture configuration must deserialize")
}

//! Frame merger: combine several pages' frame lists into one page.

use thiserror::Error;

use super::{Frame, FrameSet, Page};

/// Merger contract violations. These indicate a workflow bug, not bad input
/// files; the workflow enforces selection rules before calling in here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("no pages provided for combination")]
    NoPages,
}

/// Combine multiple pages into one.
///
/// The first page is the structural base. The authoritative frame key
/// (`frames` when its `valid == 1`, else `keyframes`) is determined from the
/// first page only; every page's frame list is resolved independently with
/// the same key rule and appended in input order. Frame indices are then
/// renumbered 0-based contiguous and the set's `frame_num` rewritten to the
/// new total. Original indices are discarded; RGB content is not touched.
///
/// The result's `page_index` is inherited from the first page; callers stamp
/// the target index via [`super::Configuration::set_page`]. The frame-count
/// cap is the workflow's responsibility, not enforced here.
pub fn combine_pages(pages: &[Page]) -> Result<Page, MergeError> {
    let (first, rest) = pages.split_first().ok_or(MergeError::NoPages)?;

    let mut combined = first.clone();
    let use_frames = combined.frames.as_ref().is_some_and(FrameSet::is_valid);

    let mut frame_data: Vec<Frame> = resolved_frames(first).to_vec();
    for page in rest {
        frame_data.extend_from_slice(resolved_frames(page));
    }

    for (index, frame) in frame_data.iter_mut().enumerate() {
        frame.frame_index = index as u32;
    }
    let total = frame_data.len() as u32;

    let slot = if use_frames {
        &mut combined.frames
    } else {
        &mut combined.keyframes
    };
    let set = slot.get_or_insert_with(FrameSet::default);
    set.frame_data = frame_data;
    set.frame_num = total;

    Ok(combined)
}

/// Frame list under the page's authoritative key: `frames` when its
/// `valid == 1`, else whatever `keyframes` holds.
///
/// Unlike [`Page::active_frames`], the `keyframes` fallback here ignores
/// the set's `valid` flag: an invalidated keyframes list still contributes
/// its frames to a combination. Schema-validated custom LED pages always
/// carry a valid set, so the two rules agree on anything the workflow
/// feeds in.
fn resolved_frames(page: &Page) -> &[Frame] {
    let set = match &page.frames {
        Some(f) if f.is_valid() => Some(f),
        _ => page.keyframes.as_ref(),
    };
    set.map(|s| s.frame_data.as_slice()).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use serde_json::json;

    #[test]
    fn combine_preserves_order_and_renumbers() {
        let a = fixtures::custom_page(5, &["#A00000", "#A00001"]);
        let b = fixtures::custom_page(5, &["#B00000", "#B00001", "#B00002"]);

        let combined = combine_pages(&[a, b]).unwrap();
        let frames = combined.frames().to_vec();
        assert_eq!(frames.len(), 5);

        let colors: Vec<&str> = frames.iter().map(|f| f.frame_rgb[0].as_str()).collect();
        assert_eq!(
            colors,
            ["#A00000", "#A00001", "#B00000", "#B00001", "#B00002"]
        );
        let indices: Vec<u32> = frames.iter().map(|f| f.frame_index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(combined.frames.as_ref().unwrap().frame_num, 5);
    }

    #[test]
    fn combine_rejects_empty_input() {
        assert_eq!(combine_pages(&[]), Err(MergeError::NoPages));
    }

    #[test]
    fn combine_does_not_mutate_rgb_content() {
        let a = fixtures::custom_page(5, &["#123456"]);
        let b = fixtures::custom_page(6, &["#654321"]);
        let expected: Vec<Vec<String>> = a
            .frames()
            .iter()
            .chain(b.frames())
            .map(|f| f.frame_rgb.clone())
            .collect();

        let combined = combine_pages(&[a, b]).unwrap();
        let got: Vec<Vec<String>> = combined
            .frames()
            .iter()
            .map(|f| f.frame_rgb.clone())
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn first_page_key_choice_wins() {
        // First page is keyframes-based; the second stores frames. The result
        // must land under the first page's key.
        let first: Page = serde_json::from_value(json!({
            "page_index": 5,
            "valid": 1,
            "frames": { "valid": 0, "frame_num": 0, "frame_data": [] },
            "keyframes": { "valid": 1, "frame_num": 1,
                           "frame_data": [fixtures::frame_value(0, "#111111")] },
        }))
        .unwrap();
        let second = fixtures::custom_page(6, &["#222222"]);

        let combined = combine_pages(&[first, second]).unwrap();
        let keyframes = combined.keyframes.as_ref().unwrap();
        assert_eq!(keyframes.frame_num, 2);
        assert_eq!(keyframes.frame_data[1].frame_rgb[0], "#222222");
        // The frames set stays as it was on the first page.
        assert_eq!(combined.frames.as_ref().unwrap().frame_num, 0);
    }

    #[test]
    fn invalid_keyframes_still_contribute_to_a_combination() {
        let first: Page = serde_json::from_value(json!({
            "page_index": 5,
            "valid": 1,
            "keyframes": { "valid": 0, "frame_num": 1,
                           "frame_data": [fixtures::frame_value(0, "#0A0A0A")] },
        }))
        .unwrap();
        let second = fixtures::custom_page(6, &["#0B0B0B"]);

        // The page has no authoritative set, yet its keyframes content is
        // still carried into the combination.
        assert!(first.active_frames().is_none());

        let combined = combine_pages(&[first, second]).unwrap();
        let keyframes = combined.keyframes.as_ref().unwrap();
        assert_eq!(keyframes.frame_num, 2);
        assert_eq!(keyframes.frame_data[0].frame_rgb[0], "#0A0A0A");
        assert_eq!(keyframes.frame_data[1].frame_rgb[0], "#0B0B0B");
    }

    #[test]
    fn combine_inherits_first_page_index() {
        let a = fixtures::custom_page(6, &["#000000"]);
        let b = fixtures::custom_page(7, &["#FFFFFF"]);
        let combined = combine_pages(&[a, b]).unwrap();
        assert_eq!(combined.page_index, 6);
    }
}

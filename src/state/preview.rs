//! Scrub preview bookkeeping
//!
//! At most one preview decode runs at a time. While it runs, newer
//! positions only move the target; when it lands the caller asks again for
//! whatever frame is current. Every decoded image (or failure) is tagged
//! with its frame index, so the player can tell an exact match from a
//! leftover.

use iced::widget::image;

use crate::media::{CaptureError, PreviewFrame};

/// What the player should show for the current frame
#[derive(Debug, Clone, Copy)]
pub enum PlayerFrame<'a> {
    /// Nothing decoded yet
    Pending,
    /// The preview of exactly the current frame
    Exact(&'a image::Handle),
    /// An older frame, shown only while the current one decodes
    Stale(&'a image::Handle),
    /// The current frame could not be decoded
    Failed(&'a CaptureError),
}

#[derive(Debug)]
struct Decoded {
    frame_index: u64,
    image: Result<image::Handle, CaptureError>,
}

/// Preview state for one selection
#[derive(Debug)]
pub struct Preview {
    selection: u64,
    in_flight: Option<u64>,
    latest: Option<Decoded>,
}

impl Preview {
    pub fn new(selection: u64) -> Self {
        Self {
            selection,
            in_flight: None,
            latest: None,
        }
    }

    /// Selection id this preview belongs to
    pub fn selection(&self) -> u64 {
        self.selection
    }

    /// Ask for `frame_index`. Returns true when a decode should start now.
    pub fn request(&mut self, frame_index: u64) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        if self.latest.as_ref().is_some_and(|d| d.frame_index == frame_index) {
            return false;
        }
        self.in_flight = Some(frame_index);
        true
    }

    /// A decode finished
    pub fn loaded(&mut self, frame_index: u64, outcome: Result<PreviewFrame, CaptureError>) {
        self.in_flight = None;
        let image = outcome.map(|frame| image::Handle::from_rgba(frame.width, frame.height, frame.rgba));
        self.latest = Some(Decoded { frame_index, image });
    }

    pub fn frame(&self, current: u64) -> PlayerFrame<'_> {
        match &self.latest {
            Some(Decoded { frame_index, image: Ok(handle) }) if *frame_index == current => {
                PlayerFrame::Exact(handle)
            }
            Some(Decoded { frame_index, image: Err(e) }) if *frame_index == current => {
                PlayerFrame::Failed(e)
            }
            Some(Decoded { image: Ok(handle), .. }) => PlayerFrame::Stale(handle),
            _ => PlayerFrame::Pending,
        }
    }

    /// True once the current frame has either an image or an error
    pub fn is_settled(&self, current: u64) -> bool {
        self.latest.as_ref().is_some_and(|d| d.frame_index == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(frame_index: u64) -> Result<PreviewFrame, CaptureError> {
        Ok(PreviewFrame { frame_index, width: 2, height: 2, rgba: vec![0; 16] })
    }

    #[test]
    fn test_one_decode_at_a_time() {
        let mut preview = Preview::new(1);
        assert!(preview.request(0));
        assert!(!preview.request(5));
        assert!(!preview.request(9));

        preview.loaded(0, decoded(0));
        assert!(preview.request(9));
        preview.loaded(9, decoded(9));

        // Already on screen
        assert!(!preview.request(9));
    }

    #[test]
    fn test_old_frame_is_never_exact() {
        let mut preview = Preview::new(1);
        preview.request(0);
        preview.loaded(0, decoded(0));
        assert!(matches!(preview.frame(0), PlayerFrame::Exact(_)));

        assert!(matches!(preview.frame(10), PlayerFrame::Stale(_)));
        assert!(!preview.is_settled(10));
    }

    #[test]
    fn test_failure_settles_current_frame() {
        let mut preview = Preview::new(1);
        preview.request(0);
        preview.loaded(0, decoded(0));

        preview.request(10);
        preview.loaded(10, Err(CaptureError::Io("decode failed".into())));
        assert!(matches!(preview.frame(10), PlayerFrame::Failed(_)));
        assert!(preview.is_settled(10));

        // Failed frames are not retried on their own
        assert!(!preview.request(10));
        assert!(preview.request(11));
    }

    #[test]
    fn test_nothing_decoded_is_pending() {
        let preview = Preview::new(4);
        assert_eq!(preview.selection(), 4);
        assert!(matches!(preview.frame(0), PlayerFrame::Pending));
        assert!(!preview.is_settled(0));
    }
}

use crate::transcript::{join_text, Segment};

/// Default minimum clip length in seconds.
pub const DEFAULT_MIN_CLIP_DURATION_SECS: f64 = 60.0;

/// Inclusive index range `[start_idx, end_idx]` into an ordered segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl Window {
    /// Single-segment window.
    pub fn at(index: usize) -> Self {
        Self {
            start_idx: index,
            end_idx: index,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_idx <= index && index <= self.end_idx
    }

    pub fn start_time(&self, segments: &[Segment]) -> f64 {
        segments[self.start_idx].start
    }

    pub fn end_time(&self, segments: &[Segment]) -> f64 {
        segments[self.end_idx].end
    }

    pub fn duration(&self, segments: &[Segment]) -> f64 {
        self.end_time(segments) - self.start_time(segments)
    }

    /// Concatenated text of every segment the window spans.
    pub fn text(&self, segments: &[Segment]) -> String {
        join_text(&segments[self.start_idx..=self.end_idx])
    }
}

/// Grow a window around `index` one segment at a time until it spans at least
/// `min_duration` seconds or covers the whole transcript.
///
/// Each step extends backward while an earlier segment exists and only then
/// forward, so the matched segment tends to land near the end of the clip.
/// A non-positive (or NaN) `min_duration` leaves the window at the matched
/// segment. Returns `None` when `index` is out of range.
pub fn expand_window(segments: &[Segment], index: usize, min_duration: f64) -> Option<Window> {
    if index >= segments.len() {
        return None;
    }

    let last_index = segments.len() - 1;
    let mut window = Window::at(index);

    while window.duration(segments) < min_duration {
        let can_grow_before = window.start_idx > 0;
        let can_grow_after = window.end_idx < last_index;

        if can_grow_before {
            window.start_idx -= 1;
        } else if can_grow_after {
            window.end_idx += 1;
        } else {
            break;
        }
    }

    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evenly_spaced(count: usize, length: f64) -> Vec<Segment> {
        (0..count)
            .map(|i| {
                let start = i as f64 * length;
                Segment::new(format!("segment {i}"), start, start + length)
            })
            .collect()
    }

    #[test]
    fn test_grows_backward_then_forward() {
        let segments = vec![
            Segment::new("t", 0.0, 10.0),
            Segment::new("great story", 10.0, 25.0),
            Segment::new("ending", 25.0, 40.0),
        ];
        let window = expand_window(&segments, 1, 30.0).unwrap();
        assert_eq!(window, Window { start_idx: 0, end_idx: 2 });
        assert_eq!(window.start_time(&segments), 0.0);
        assert_eq!(window.end_time(&segments), 40.0);
        assert_eq!(window.text(&segments), "t great story ending");
    }

    #[test]
    fn test_backward_preferred_while_available() {
        let segments = evenly_spaced(10, 10.0);
        let window = expand_window(&segments, 5, 30.0).unwrap();
        // 10 -> 20 -> 30, all backward
        assert_eq!(window, Window { start_idx: 3, end_idx: 5 });
    }

    #[test]
    fn test_first_segment_only_grows_forward() {
        let segments = evenly_spaced(10, 10.0);
        let window = expand_window(&segments, 0, 35.0).unwrap();
        assert_eq!(window, Window { start_idx: 0, end_idx: 3 });
    }

    #[test]
    fn test_last_segment_never_passes_end() {
        let segments = evenly_spaced(5, 10.0);
        let window = expand_window(&segments, 4, 25.0).unwrap();
        assert_eq!(window, Window { start_idx: 2, end_idx: 4 });
    }

    #[test]
    fn test_no_growth_when_segment_long_enough() {
        let segments = vec![Segment::new("hello", 0.0, 90.0)];
        let window = expand_window(&segments, 0, 60.0).unwrap();
        assert_eq!(window, Window::at(0));
        assert_eq!(window.duration(&segments), 90.0);
    }

    #[test]
    fn test_non_positive_minimum_never_grows() {
        let segments = evenly_spaced(3, 10.0);
        assert_eq!(expand_window(&segments, 1, 0.0), Some(Window::at(1)));
        assert_eq!(expand_window(&segments, 1, -5.0), Some(Window::at(1)));
        assert_eq!(expand_window(&segments, 1, f64::NAN), Some(Window::at(1)));
    }

    #[test]
    fn test_short_transcript_caps_at_bounds() {
        let segments = evenly_spaced(3, 10.0);
        let window = expand_window(&segments, 1, 600.0).unwrap();
        assert_eq!(window, Window { start_idx: 0, end_idx: 2 });
        assert_eq!(window.duration(&segments), 30.0);
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(expand_window(&[], 0, 60.0), None);
        assert_eq!(expand_window(&evenly_spaced(2, 1.0), 2, 60.0), None);
    }

    #[test]
    fn test_window_contains_match_and_meets_minimum() {
        let segments = evenly_spaced(12, 7.5);
        let total = segments.last().unwrap().end - segments[0].start;
        for index in 0..segments.len() {
            for minimum in [0.0, 5.0, 20.0, 60.0, 200.0] {
                let window = expand_window(&segments, index, minimum).unwrap();
                assert!(window.contains(index));
                assert!(window.duration(&segments) >= minimum.min(total));
            }
        }
    }

    #[test]
    fn test_gap_between_segments_counts_toward_duration() {
        let segments = vec![
            Segment::new("a", 0.0, 5.0),
            Segment::new("b", 50.0, 55.0),
            Segment::new("c", 55.0, 70.0),
        ];
        let window = expand_window(&segments, 1, 40.0).unwrap();
        assert_eq!(window, Window { start_idx: 0, end_idx: 1 });
        assert_eq!(window.duration(&segments), 55.0);
    }
}

//! Property tests for the pixel pipeline and the frame codec.

use mui_panel::command::{DisplayMode, PANEL_HEIGHT, PANEL_WIDTH};
use mui_panel::frame::{self, checksum, pack_pixels, unpack_pixels};
use mui_panel::{PixelBuffer, Region, diff_region};
use proptest::prelude::*;

fn panel_buffer() -> impl Strategy<Value = PixelBuffer> {
    proptest::collection::vec(any::<bool>(), PANEL_WIDTH as usize * PANEL_HEIGHT as usize).prop_map(
        |bits| {
            let mut buf = PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT);
            for (i, on) in bits.into_iter().enumerate() {
                let (x, y) = (i % PANEL_WIDTH as usize, i / PANEL_WIDTH as usize);
                buf.set(x as i32, y as i32, on);
            }
            buf
        },
    )
}

/// A blank panel buffer with a handful of pixels flipped
fn sparse_change() -> impl Strategy<Value = (PixelBuffer, Vec<(i32, i32)>)> {
    proptest::collection::vec((0..PANEL_WIDTH as i32, 0..PANEL_HEIGHT as i32), 0..6).prop_map(
        |points| {
            let mut buf = PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT);
            for &(x, y) in &points {
                buf.set(x, y, true);
            }
            (buf, points)
        },
    )
}

fn trailing_checksum_ok(packet: &[u8]) -> bool {
    let (body, last) = packet.split_at(packet.len() - 1);
    checksum(&body[2..]) == last[0]
        && last[0] == (body[2..].iter().map(|&b| b as u32).sum::<u32>() & 0xFF) as u8
}

proptest! {
    #[test]
    fn display_request_checksum(fade in any::<u8>(), duty in any::<u8>(), mode in 0u8..3) {
        let mode = match mode {
            0 => DisplayMode::On,
            1 => DisplayMode::Refresh,
            _ => DisplayMode::Off,
        };
        prop_assert!(trailing_checksum_ok(&frame::display_request(mode, fade, duty)));
    }

    #[test]
    fn full_layout_checksum(pixels in panel_buffer()) {
        let packet = frame::full_layout(&pixels);
        prop_assert_eq!(packet.len(), 813);
        prop_assert!(trailing_checksum_ok(&packet));
    }

    #[test]
    fn partial_layout_checksum_and_length((current, _) in sparse_change()) {
        let previous = PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT);
        if let Some(packet) = frame::layout_for_diff(&previous, &current) {
            prop_assert!(trailing_checksum_ok(&packet));
            let length = u16::from_be_bytes([packet[0], packet[1]]) as usize;
            prop_assert_eq!(length, packet.len() - 2);
        }
    }

    #[test]
    fn pack_round_trip(bits in any::<[bool; 8]>()) {
        prop_assert_eq!(unpack_pixels(pack_pixels(bits)), bits);
        prop_assert_eq!(pack_pixels(bits) & 0x80 != 0, bits[0]);
    }

    #[test]
    fn diff_is_sound(previous in panel_buffer(), current in panel_buffer()) {
        match diff_region(&previous, &current) {
            None => prop_assert_eq!(&previous, &current),
            Some(region) => {
                for y in 0..PANEL_HEIGHT as i32 {
                    for x in 0..PANEL_WIDTH as i32 {
                        let inside = (region.min_x as i32..=region.max_x as i32).contains(&x)
                            && (region.min_y as i32..=region.max_y as i32).contains(&y);
                        if previous.get(x, y) != current.get(x, y) {
                            prop_assert!(inside);
                        }
                    }
                }
                // every edge of the box is touched by a difference
                let differs = |x: i32, y: i32| previous.get(x, y) != current.get(x, y);
                prop_assert!((0..PANEL_HEIGHT as i32).any(|y| differs(region.min_x as i32, y)));
                prop_assert!((0..PANEL_HEIGHT as i32).any(|y| differs(region.max_x as i32, y)));
                prop_assert!((0..PANEL_WIDTH as i32).any(|x| differs(x, region.min_y as i32)));
                prop_assert!((0..PANEL_WIDTH as i32).any(|x| differs(x, region.max_y as i32)));
            }
        }
    }

    #[test]
    fn aligned_region_covers_changes((current, points) in sparse_change()) {
        let previous = PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT);
        let Some(diff) = diff_region(&previous, &current) else {
            prop_assert!(points.is_empty());
            return Ok(());
        };
        let Region { x, y, w, h } = diff.aligned(PANEL_WIDTH, PANEL_HEIGHT);

        prop_assert_eq!(x % 8, 0);
        prop_assert!(x <= diff.min_x);
        prop_assert_eq!(w % 8, 0);
        prop_assert!(x + w > diff.max_x);
        prop_assert!(x + w <= PANEL_WIDTH);
        prop_assert_eq!(y, diff.min_y);
        prop_assert_eq!(y + h, diff.max_y + 1);
        prop_assert!(y + h <= PANEL_HEIGHT);
    }

    #[test]
    fn merge_containment(
        (w, h) in (1u16..16, 1u16..16),
        (ax, ay) in (-20i32..40, -20i32..40),
        seed in any::<u64>(),
    ) {
        let mut dst = PixelBuffer::new(32, 24);
        dst.set_anchor(3, 2);
        let mut src = PixelBuffer::new(w, h);
        src.set_anchor(ax, ay);

        let mut state = seed;
        let mut next = || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            state >> 63 == 1
        };
        for y in 0..32 {
            for x in 0..32 {
                dst.set(x, y, next());
                src.set(x, y, next());
            }
        }
        let before = dst.clone();
        dst.merge(&src);

        for y in 0..dst.height() as i32 {
            for x in 0..dst.width() as i32 {
                let (abs_x, abs_y) = (x + dst.anchor_x(), y + dst.anchor_y());
                let in_src = (ax..ax + w as i32).contains(&abs_x)
                    && (ay..ay + h as i32).contains(&abs_y);
                let expected = if in_src {
                    src.get(abs_x - ax, abs_y - ay)
                } else {
                    before.get(x, y)
                };
                prop_assert_eq!(dst.get(x, y), expected);
            }
        }
    }
}

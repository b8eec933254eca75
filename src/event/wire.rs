//! Binary layout of posted records.
//!
//! Consumers identify fields by number, so these codes must never change. Every
//! record is little-endian:
//!
//! ```text
//! record := kind:u32  timestamp_ns:u64  location_x:f64  location_y:f64  field_count:u16  field*
//! field  := id:u32  tag:u8  value:[u8; 8]        tag 0 = i64, tag 1 = f64
//! ```
//!
//! Axis 1 is vertical and axis 2 horizontal, as in native scroll records.

use super::{EventRecord, GestureRecord, ScrollRecord};
use bytes::{BufMut, BytesMut};

/// Record kind of continuous scroll records.
pub const KIND_SCROLL_WHEEL: u32 = 22;
/// Record kind of gesture records.
pub const KIND_GESTURE: u32 = 29;

pub const FIELD_SCROLL_DELTA_AXIS_1: u32 = 11;
pub const FIELD_SCROLL_DELTA_AXIS_2: u32 = 12;
pub const FIELD_SCROLL_IS_CONTINUOUS: u32 = 88;
pub const FIELD_SCROLL_POINT_DELTA_AXIS_1: u32 = 96;
pub const FIELD_SCROLL_POINT_DELTA_AXIS_2: u32 = 97;
pub const FIELD_SCROLL_PHASE: u32 = 99;
pub const FIELD_MOMENTUM_PHASE: u32 = 123;
pub const FIELD_SCROLL_DIRECTION_INVERTED: u32 = 137;

pub const FIELD_GESTURE_HID_TYPE: u32 = 110;
pub const FIELD_GESTURE_SCROLL_X: u32 = 119;
pub const FIELD_GESTURE_SCROLL_Y: u32 = 120;
pub const FIELD_GESTURE_PHASE: u32 = 132;

/// HID event type value marking a gesture record as scroll.
pub const HID_TYPE_SCROLL: i64 = 6;

pub const TAG_INTEGER: u8 = 0;
pub const TAG_DOUBLE: u8 = 1;

/// Bytes in a record header.
pub const HEADER_LEN: usize = 4 + 8 + 8 + 8 + 2;
/// Bytes per field.
pub const FIELD_LEN: usize = 4 + 1 + 8;

/// A single numbered field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Double(f64),
}

/// Fields of a scroll record, in the order they are written.
pub fn scroll_fields(record: &ScrollRecord) -> [(u32, FieldValue); 8] {
    use FieldValue::*;
    [
        (FIELD_SCROLL_DELTA_AXIS_1, Integer(record.line_y)),
        (FIELD_SCROLL_DELTA_AXIS_2, Integer(record.line_x)),
        (FIELD_SCROLL_POINT_DELTA_AXIS_1, Double(record.point_delta.y)),
        (FIELD_SCROLL_POINT_DELTA_AXIS_2, Double(record.point_delta.x)),
        (FIELD_SCROLL_PHASE, Integer(record.gesture_phase.code())),
        (FIELD_MOMENTUM_PHASE, Integer(record.momentum_phase.code())),
        (FIELD_SCROLL_IS_CONTINUOUS, Integer(record.continuous as i64)),
        (
            FIELD_SCROLL_DIRECTION_INVERTED,
            Integer(record.direction_inverted as i64),
        ),
    ]
}

/// Fields of a gesture record, in the order they are written.
pub fn gesture_fields(record: &GestureRecord) -> [(u32, FieldValue); 4] {
    use FieldValue::*;
    [
        (FIELD_GESTURE_HID_TYPE, Integer(HID_TYPE_SCROLL)),
        (FIELD_GESTURE_SCROLL_X, Double(record.delta.x)),
        (FIELD_GESTURE_SCROLL_Y, Double(record.delta.y)),
        (FIELD_GESTURE_PHASE, Integer(record.phase.code())),
    ]
}

/// Append one record to `buf`.
pub fn encode_record(record: &EventRecord, buf: &mut impl BufMut) {
    match record {
        EventRecord::Scroll(scroll) => write_record(
            buf,
            KIND_SCROLL_WHEEL,
            scroll.timestamp.as_nanos() as u64,
            (scroll.location.x, scroll.location.y),
            &scroll_fields(scroll),
        ),
        EventRecord::Gesture(gesture) => write_record(
            buf,
            KIND_GESTURE,
            gesture.timestamp.as_nanos() as u64,
            (gesture.location.x, gesture.location.y),
            &gesture_fields(gesture),
        ),
    }
}

/// Encode a sequence of records into one contiguous buffer.
pub fn encode_records<'a>(records: impl IntoIterator<Item = &'a EventRecord>) -> BytesMut {
    let mut buf = BytesMut::new();
    for record in records {
        encode_record(record, &mut buf);
    }
    buf
}

fn write_record(
    buf: &mut impl BufMut,
    kind: u32,
    timestamp_ns: u64,
    location: (f64, f64),
    fields: &[(u32, FieldValue)],
) {
    buf.put_u32_le(kind);
    buf.put_u64_le(timestamp_ns);
    buf.put_f64_le(location.0);
    buf.put_f64_le(location.1);
    buf.put_u16_le(fields.len() as u16);
    for (id, value) in fields {
        buf.put_u32_le(*id);
        match value {
            FieldValue::Integer(v) => {
                buf.put_u8(TAG_INTEGER);
                buf.put_i64_le(*v);
            }
            FieldValue::Double(v) => {
                buf.put_u8(TAG_DOUBLE);
                buf.put_f64_le(*v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GesturePhase, MomentumPhase};
    use crate::vector::Vector;
    use std::time::Duration;

    fn field_at(bytes: &[u8], index: usize) -> (u32, u8, [u8; 8]) {
        let start = HEADER_LEN + index * FIELD_LEN;
        let id = u32::from_le_bytes(bytes[start..start + 4].try_into().unwrap());
        let tag = bytes[start + 4];
        let value = bytes[start + 5..start + 13].try_into().unwrap();
        (id, tag, value)
    }

    #[test]
    fn scroll_record_layout() {
        let record = EventRecord::Scroll(ScrollRecord {
            timestamp: Duration::from_micros(1_500),
            location: Vector::new(100.0, 200.5),
            line_x: -2,
            line_y: 3,
            point_delta: Vector::new(-17.25, 31.5),
            gesture_phase: GesturePhase::Changed,
            momentum_phase: MomentumPhase::None,
            continuous: true,
            direction_inverted: false,
        });
        let bytes = encode_records([&record]);
        assert_eq!(bytes.len(), HEADER_LEN + 8 * FIELD_LEN);

        assert_eq!(&bytes[0..4], &22u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &1_500_000u64.to_le_bytes());
        assert_eq!(&bytes[12..20], &100.0f64.to_le_bytes());
        assert_eq!(&bytes[20..28], &200.5f64.to_le_bytes());
        assert_eq!(&bytes[28..30], &8u16.to_le_bytes());

        // Vertical line delta goes into axis 1
        assert_eq!(field_at(&bytes, 0), (11, TAG_INTEGER, 3i64.to_le_bytes()));
        assert_eq!(field_at(&bytes, 1), (12, TAG_INTEGER, (-2i64).to_le_bytes()));
        assert_eq!(field_at(&bytes, 2), (96, TAG_DOUBLE, 31.5f64.to_le_bytes()));
        assert_eq!(field_at(&bytes, 3), (97, TAG_DOUBLE, (-17.25f64).to_le_bytes()));
        assert_eq!(field_at(&bytes, 4), (99, TAG_INTEGER, 2i64.to_le_bytes()));
        assert_eq!(field_at(&bytes, 5), (123, TAG_INTEGER, 0i64.to_le_bytes()));
        assert_eq!(field_at(&bytes, 6), (88, TAG_INTEGER, 1i64.to_le_bytes()));
        assert_eq!(field_at(&bytes, 7), (137, TAG_INTEGER, 0i64.to_le_bytes()));
    }

    #[test]
    fn gesture_record_keeps_negative_zero_bits() {
        let record = EventRecord::Gesture(GestureRecord {
            timestamp: Duration::ZERO,
            location: Vector::ZERO,
            delta: Vector::new(-0.0, 4.0),
            phase: GesturePhase::Began,
        });
        let bytes = encode_records([&record]);
        assert_eq!(bytes.len(), HEADER_LEN + 4 * FIELD_LEN);
        assert_eq!(&bytes[0..4], &29u32.to_le_bytes());

        assert_eq!(field_at(&bytes, 0), (110, TAG_INTEGER, 6i64.to_le_bytes()));
        let (id, tag, value) = field_at(&bytes, 1);
        assert_eq!((id, tag), (119, TAG_DOUBLE));
        assert_eq!(u64::from_le_bytes(value), (-0.0f64).to_bits());
        assert_eq!(field_at(&bytes, 3), (132, TAG_INTEGER, 1i64.to_le_bytes()));
    }

    #[test]
    fn records_are_concatenated_in_order() {
        let scroll = EventRecord::Scroll(ScrollRecord {
            timestamp: Duration::ZERO,
            location: Vector::ZERO,
            line_x: 0,
            line_y: 0,
            point_delta: Vector::ZERO,
            gesture_phase: GesturePhase::Ended,
            momentum_phase: MomentumPhase::None,
            continuous: true,
            direction_inverted: true,
        });
        let gesture = EventRecord::Gesture(GestureRecord {
            timestamp: Duration::ZERO,
            location: Vector::ZERO,
            delta: Vector::new(-0.0, -0.0),
            phase: GesturePhase::Ended,
        });
        let bytes = encode_records([&scroll, &gesture]);
        let second = HEADER_LEN + 8 * FIELD_LEN;
        assert_eq!(&bytes[0..4], &KIND_SCROLL_WHEEL.to_le_bytes());
        assert_eq!(&bytes[second..second + 4], &KIND_GESTURE.to_le_bytes());
        assert_eq!(bytes.len(), second + HEADER_LEN + 4 * FIELD_LEN);
    }
}

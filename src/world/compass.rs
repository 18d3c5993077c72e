//! Yaw → compass conversion.
//!
//! Yaw follows the world convention: 0° faces south, growing clockwise
//! (west at 90°), possibly negative. Headings are reported on that same
//! south-origin circle.

/// Eight compass points in yaw order, two characters each so octant output
/// is fixed-width.
pub const OCTANTS: [&str; 8] = [" S", "SW", " W", "NW", " N", "NE", " E", "SE"];

/// The octant label nearest to a yaw angle.
pub fn octant(yaw: f32) -> &'static str {
    let index = ((yaw + 360.0 + 22.5) / 45.0) as i32 & 7;
    OCTANTS[index as usize]
}

/// Heading in whole degrees, 0..=359.
pub fn heading(yaw: f32) -> i32 {
    (yaw + 360.0).round() as i32 % 360
}

/// Heading in tenths of a degree, 0..=3599. Wraparound happens on the
/// already-rounded tenths so 359.96° lands on 0, not 3600.
pub fn heading_tenths(yaw: f32) -> i32 {
    ((yaw + 360.0) * 10.0).round() as i32 % 3600
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Fixed1;

    #[test]
    fn test_octant_cardinals() {
        assert_eq!(octant(0.0), " S");
        assert_eq!(octant(90.0), " W");
        assert_eq!(octant(180.0), " N");
        assert_eq!(octant(270.0), " E");
    }

    #[test]
    fn test_octant_boundaries() {
        assert_eq!(octant(22.4), " S");
        assert_eq!(octant(22.5), "SW");
        assert_eq!(octant(45.0), "SW");
        assert_eq!(octant(337.4), "SE");
        assert_eq!(octant(337.5), " S");
        assert_eq!(octant(359.0), " S");
    }

    #[test]
    fn test_octant_negative_yaw() {
        assert_eq!(octant(-90.0), " E");
        assert_eq!(octant(-22.5), " S");
        assert_eq!(octant(-23.0), "SE");
    }

    #[test]
    fn test_heading_wraps() {
        assert_eq!(heading(0.0), 0);
        assert_eq!(heading(359.4), 359);
        assert_eq!(heading(359.6), 0);
        assert_eq!(heading(-90.0), 270);
    }

    #[test]
    fn test_heading_tenths_boundary() {
        assert_eq!(heading_tenths(359.9), 3599);
        assert_eq!(Fixed1(heading_tenths(359.9)).to_string(), "359.9");
        // 359.96 rounds to tenths 3600, which wraps to 0.
        assert_eq!(heading_tenths(359.96), 0);
        assert_eq!(Fixed1(heading_tenths(359.96)).to_string(), "0.0");
    }
}

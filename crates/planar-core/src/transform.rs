//! 视图变换
//!
//! 屏幕坐标 y 轴向下，世界坐标 y 轴向上。

use crate::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 世界坐标与屏幕坐标之间的缩放 + 平移变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// 每个世界单位对应的像素数
    pub scale: f64,
    /// 世界原点在屏幕上的位置
    pub offset: Vector2,
}

impl ViewTransform {
    pub fn new(scale: f64, offset: Vector2) -> Self {
        Self { scale, offset }
    }

    pub fn world_to_screen(&self, world: &Point2) -> Point2 {
        Point2::new(
            world.x * self.scale + self.offset.x,
            -world.y * self.scale + self.offset.y,
        )
    }

    pub fn screen_to_world(&self, screen: &Point2) -> Point2 {
        Point2::new(
            (screen.x - self.offset.x) / self.scale,
            -(screen.y - self.offset.y) / self.scale,
        )
    }

    /// 屏幕像素容差换算为世界长度
    pub fn screen_tolerance_to_world(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let view = ViewTransform::new(2.5, Vector2::new(400.0, 300.0));
        let world = Point2::new(12.0, -7.5);
        let screen = view.world_to_screen(&world);
        let back = view.screen_to_world(&screen);
        assert!((back - world).norm() < 1e-12);
        assert!((view.screen_tolerance_to_world(10.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_y_axis_flips() {
        let view = ViewTransform::new(1.0, Vector2::new(0.0, 100.0));
        let screen = view.world_to_screen(&Point2::new(0.0, 10.0));
        assert_eq!(screen, Point2::new(0.0, 90.0));
    }
}

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use nalgebra::Point2;
use std::path::Path;

use crate::compare::ComparisonOutcome;
use crate::config::AnnotateConfig;
use crate::error::PoseResult;
use crate::pose::{bounding_box, shoulder_center, BoundingBox, LandmarkIndex, LandmarkSet};
use crate::render::skeleton::{
    BBOX_COLOR, CENTER_COLOR, HEAD_LINE_COLOR, LANDMARK_COLOR, MATCH_COLOR, MISMATCH_COLOR,
    SKELETON_COLOR, SKELETON_CONNECTIONS,
};

/// 判定帯の高さ（ピクセル）
const VERDICT_BAND_HEIGHT: usize = 24;

/// 0xRRGGBB フレームバッファへの描画
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    /// 黒で塗りつぶしたキャンバス
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0u32; width * height],
            width,
            height,
        }
    }

    /// RGB画像をバッファにコピー
    pub fn from_image(image: &RgbImage) -> Self {
        let buffer = image
            .pixels()
            .map(|Rgb([r, g, b])| ((*r as u32) << 16) | ((*g as u32) << 8) | *b as u32)
            .collect();
        Self {
            buffer,
            width: image.width() as usize,
            height: image.height() as usize,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    /// 範囲外ならNone
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.buffer[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.buffer[y as usize * self.width + x as usize];
            Rgb([(c >> 16) as u8, (c >> 8) as u8, c as u8])
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save(path)
            .with_context(|| format!("Failed to write image {}", path.display()))?;
        Ok(())
    }

    /// 骨格とランドマークを描画
    pub fn draw_landmarks(&mut self, landmarks: &LandmarkSet) {
        for (start_idx, end_idx) in SKELETON_CONNECTIONS.iter() {
            if let (Ok(start), Ok(end)) = (landmarks.get(*start_idx), landmarks.get(*end_idx)) {
                self.draw_line(start.x, start.y, end.x, end.y, SKELETON_COLOR);
            }
        }

        for lm in landmarks.iter() {
            self.draw_circle(lm.x, lm.y, 4, LANDMARK_COLOR);
        }
    }

    /// 肩の中点、鼻への線、BBoxを描画
    pub fn draw_derived(&mut self, landmarks: &LandmarkSet, config: &AnnotateConfig) -> PoseResult<()> {
        let center = shoulder_center(landmarks)?;
        let nose = landmarks.point(LandmarkIndex::Nose)?;
        self.draw_line(center.x, center.y, nose.x, nose.y, HEAD_LINE_COLOR);
        self.draw_circle(center.x, center.y, 5, CENTER_COLOR);

        if config.bbox {
            let bbox = bounding_box(landmarks, config.bbox_with_hands)?;
            self.draw_rect(&bbox, BBOX_COLOR);
            let c = bbox.center();
            self.draw_circle(c.x, c.y, 5, CENTER_COLOR);
        }
        Ok(())
    }

    /// 判定結果を描画
    ///
    /// 上端に一致なら緑、不一致なら赤の帯。不一致部位の頂点を赤い輪で囲む。
    pub fn draw_outcome(&mut self, landmarks: &LandmarkSet, outcome: &ComparisonOutcome) -> PoseResult<()> {
        let color = if outcome.matched { MATCH_COLOR } else { MISMATCH_COLOR };
        for y in 0..VERDICT_BAND_HEIGHT.min(self.height) {
            for x in 0..self.width {
                self.buffer[y * self.width + x] = color;
            }
        }

        for part in outcome.mismatched_parts() {
            let vertex = match part.vertex() {
                Some(index) => landmarks.point(index)?,
                None => shoulder_center(landmarks)?,
            };
            self.draw_ring(vertex, 10, MISMATCH_COLOR);
        }
        Ok(())
    }

    /// 画面外の辺は1ピクセル外側に寄せて描画する
    fn draw_rect(&mut self, bbox: &BoundingBox, color: u32) {
        let (w, h) = (self.width as i64, self.height as i64);
        let clamp_x = |v: i64| v.clamp(-1, w) as i32;
        let clamp_y = |v: i64| v.clamp(-1, h) as i32;
        let (x0, y0) = (clamp_x(bbox.x as i64), clamp_y(bbox.y as i64));
        let x1 = clamp_x(bbox.x as i64 + bbox.width as i64);
        let y1 = clamp_y(bbox.y as i64 + bbox.height as i64);
        self.draw_line(x0, y0, x1, y0, color);
        self.draw_line(x1, y0, x1, y1, color);
        self.draw_line(x1, y1, x0, y1, color);
        self.draw_line(x0, y1, x0, y0, color);
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel_wide(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx.saturating_add(dx), cy.saturating_add(dy), color);
                }
            }
        }
    }

    /// 輪を描画（太さ2）
    fn draw_ring(&mut self, center: Point2<i32>, radius: i32, color: u32) {
        let inner = (radius - 2) * (radius - 2);
        let outer = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d = dx * dx + dy * dy;
                if d <= outer && d > inner {
                    self.set_pixel(center.x.saturating_add(dx), center.y.saturating_add(dy), color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        self.set_pixel_wide(x as i64, y as i64, color);
    }

    fn set_pixel_wide(&mut self, x: i64, y: i64, color: u32) {
        if x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::is_pose_correct;
    use crate::pose::testing::{moved, standing_pose};
    use crate::pose::BodyPart;

    #[test]
    fn test_new_is_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.buffer().len(), 12);
        assert!(canvas.buffer().iter().all(|&c| c == 0));
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.pixel(-1, 0), None);
    }

    #[test]
    fn test_out_of_bounds_drawing_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(-20, 5, 30, 5, SKELETON_COLOR);
        canvas.draw_circle(100, 100, 4, LANDMARK_COLOR);
        assert_eq!(canvas.pixel(0, 5), Some(SKELETON_COLOR));
        assert_eq!(canvas.pixel(9, 5), Some(SKELETON_COLOR));
        assert_eq!(canvas.pixel(5, 4), Some(0));
    }

    #[test]
    fn test_draw_landmarks() {
        let landmarks = standing_pose();
        let mut canvas = Canvas::new(640, 480);
        canvas.draw_landmarks(&landmarks);
        assert_eq!(canvas.pixel(320, 80), Some(LANDMARK_COLOR));
        // 肩同士を結ぶ線
        assert_eq!(canvas.pixel(320, 150), Some(SKELETON_COLOR));
    }

    #[test]
    fn test_draw_derived() {
        let landmarks = standing_pose();
        let mut canvas = Canvas::new(640, 480);
        canvas.draw_derived(&landmarks, &AnnotateConfig::default()).unwrap();
        assert_eq!(canvas.pixel(320, 150), Some(CENTER_COLOR));
        assert_eq!(canvas.pixel(320, 100), Some(HEAD_LINE_COLOR));
        // with_hands: x1 = 220 - 60
        assert_eq!(canvas.pixel(160, 200), Some(BBOX_COLOR));
    }

    #[test]
    fn test_draw_outcome() {
        let reference = standing_pose();
        let live = moved(&reference, LandmarkIndex::LeftWrist, 440, 210);
        let outcome = is_pose_correct(&reference, &live, &BodyPart::ALL, 10.0, 7).unwrap();
        assert!(!outcome.matched);

        let mut canvas = Canvas::new(640, 480);
        canvas.draw_outcome(&live, &outcome).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(MISMATCH_COLOR));
        assert_eq!(canvas.pixel(639, 23), Some(MISMATCH_COLOR));
        assert_eq!(canvas.pixel(0, 24), Some(0));
        // 不一致の right_elbow の頂点は id 13 (440, 150)
        assert_eq!(canvas.pixel(450, 150), Some(MISMATCH_COLOR));
        assert_eq!(canvas.pixel(440, 150), Some(0));
    }

    #[test]
    fn test_draw_rect_far_outside() {
        let mut canvas = Canvas::new(20, 10);
        let bbox = BoundingBox {
            x: -5,
            y: 2,
            width: i32::MAX,
            height: 5,
        };
        canvas.draw_rect(&bbox, BBOX_COLOR);
        // 左右の辺は画面外、上下の辺は画面の端から端まで
        assert_eq!(canvas.pixel(0, 2), Some(BBOX_COLOR));
        assert_eq!(canvas.pixel(19, 2), Some(BBOX_COLOR));
        assert_eq!(canvas.pixel(0, 7), Some(BBOX_COLOR));
        assert_eq!(canvas.pixel(0, 5), Some(0));

        canvas.draw_circle(i32::MAX, i32::MAX, 4, LANDMARK_COLOR);
        canvas.draw_ring(Point2::new(i32::MIN, i32::MIN), 10, MISMATCH_COLOR);
    }

    #[test]
    fn test_image_roundtrip() {
        let mut canvas = Canvas::new(3, 2);
        canvas.set_pixel(1, 1, 0x123456);
        let image = canvas.to_image();
        assert_eq!(image.get_pixel(1, 1), &Rgb([0x12, 0x34, 0x56]));

        let back = Canvas::from_image(&image);
        assert_eq!(back.buffer(), canvas.buffer());
    }
}

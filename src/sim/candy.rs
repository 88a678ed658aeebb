//! Candy dynamics
//!
//! Attached: the candy sits at the mean of its uncut ropes' end points.
//! Free: gravity, air resistance, and bounces off the walls and floor.
//! Attached -> Free happens once per run, the tick the last rope is cut.

use glam::Vec2;

use super::state::{Candy, CandyMode, Rope, RopeSet};
use crate::tuning::Tuning;

/// Mean end point of the uncut ropes in `set`, if any
pub fn attached_mean(ropes: &[Rope], set: RopeSet) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for id in set.iter() {
        if let Some(rope) = ropes.get(id as usize) {
            if !rope.cut {
                sum += rope.end;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f32)
}

impl Candy {
    /// Advance the candy one tick. Returns true on the tick it is released.
    pub fn update(&mut self, ropes: &[Rope], dt: f32, canvas: Vec2, tuning: &Tuning) -> bool {
        let mut released = false;

        if self.mode == CandyMode::Attached {
            match attached_mean(ropes, self.ropes) {
                Some(mean) => {
                    self.pos = mean;
                    return false;
                }
                None => {
                    self.mode = CandyMode::Free;
                    released = true;
                }
            }
        }

        self.integrate(dt, tuning);
        self.bounce(canvas, tuning);
        released
    }

    fn integrate(&mut self, dt: f32, tuning: &Tuning) {
        self.vel.y += tuning.gravity * dt;
        self.vel *= tuning.air_resistance;
        self.pos += self.vel * dt;
    }

    fn bounce(&mut self, canvas: Vec2, tuning: &Tuning) {
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x * tuning.wall_restitution;
        } else if self.pos.x + self.radius > canvas.x {
            self.pos.x = canvas.x - self.radius;
            self.vel.x = -self.vel.x * tuning.wall_restitution;
        }

        if tuning.floor_enabled && self.pos.y + self.radius > canvas.y {
            self.pos.y = canvas.y - self.radius;
            self.vel.y = -self.vel.y * tuning.floor_restitution;
            self.vel.x *= tuning.floor_friction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);
    const DT: f32 = 1.0 / 60.0;

    fn rope_at(id: u8, anchor: Vec2, end: Vec2) -> Rope {
        let mut rope = Rope::new(id, anchor, 1000.0);
        rope.step(end);
        rope
    }

    fn free_candy(pos: Vec2, vel: Vec2) -> Candy {
        let mut candy = Candy::new(pos, 15.0, RopeSet::EMPTY);
        candy.mode = CandyMode::Free;
        candy.vel = vel;
        candy
    }

    #[test]
    fn test_attached_candy_sits_at_mean() {
        let ropes = vec![
            rope_at(0, Vec2::new(0.0, 0.0), Vec2::new(100.0, 200.0)),
            rope_at(1, Vec2::new(400.0, 0.0), Vec2::new(300.0, 100.0)),
        ];
        let mut candy = Candy::new(Vec2::ZERO, 15.0, RopeSet::first_n(2));
        let released = candy.update(&ropes, DT, CANVAS, &Tuning::default());
        assert!(!released);
        assert!(candy.is_attached());
        assert_eq!(candy.pos, Vec2::new(200.0, 150.0));
        assert_eq!(candy.vel, Vec2::ZERO);
    }

    #[test]
    fn test_cut_ropes_excluded_from_mean() {
        let mut ropes = vec![
            rope_at(0, Vec2::ZERO, Vec2::new(100.0, 100.0)),
            rope_at(1, Vec2::ZERO, Vec2::new(300.0, 300.0)),
        ];
        ropes[1].cut = true;
        assert_eq!(
            attached_mean(&ropes, RopeSet::first_n(2)),
            Some(Vec2::new(100.0, 100.0))
        );
    }

    #[test]
    fn test_release_when_all_ropes_cut() {
        let mut ropes = vec![rope_at(0, Vec2::new(400.0, 60.0), Vec2::new(400.0, 180.0))];
        ropes[0].cut = true;
        let mut candy = Candy::new(Vec2::new(400.0, 180.0), 15.0, RopeSet::first_n(1));
        let released = candy.update(&ropes, DT, CANVAS, &Tuning::default());
        assert!(released);
        assert!(!candy.is_attached());
        assert!(candy.vel.y > 0.0);

        // Never re-attaches, never re-reports release
        let released = candy.update(&ropes, DT, CANVAS, &Tuning::default());
        assert!(!released);
        assert!(!candy.is_attached());
    }

    #[test]
    fn test_free_fall_accelerates() {
        let tuning = Tuning::default();
        let mut candy = free_candy(Vec2::new(400.0, 100.0), Vec2::ZERO);
        let mut last_vy = candy.vel.y;
        for _ in 0..20 {
            candy.update(&[], DT, CANVAS, &tuning);
            assert!(candy.vel.y > last_vy);
            last_vy = candy.vel.y;
        }
    }

    #[test]
    fn test_floor_bounce() {
        let tuning = Tuning::default();
        let mut candy = free_candy(Vec2::new(400.0, 590.0), Vec2::new(100.0, 300.0));
        candy.update(&[], DT, CANVAS, &tuning);

        let vy_before = (300.0 + tuning.gravity * DT) * tuning.air_resistance;
        let vx_before = 100.0 * tuning.air_resistance;
        assert_eq!(candy.pos.y, 600.0 - 15.0);
        assert!((candy.vel.y - (-vy_before * 0.5)).abs() < 1e-3);
        assert!((candy.vel.x - vx_before * 0.9).abs() < 1e-3);
    }

    #[test]
    fn test_floor_disabled_lets_candy_fall_through() {
        let tuning = Tuning {
            floor_enabled: false,
            ..Tuning::default()
        };
        let mut candy = free_candy(Vec2::new(400.0, 590.0), Vec2::new(0.0, 300.0));
        candy.update(&[], DT, CANVAS, &tuning);
        assert!(candy.pos.y > 590.0);
        assert!(candy.vel.y > 0.0);
    }

    #[test]
    fn test_wall_bounce() {
        let tuning = Tuning::default();

        let mut candy = free_candy(Vec2::new(5.0, 300.0), Vec2::new(-200.0, 0.0));
        candy.update(&[], DT, CANVAS, &tuning);
        assert_eq!(candy.pos.x, 15.0);
        assert!((candy.vel.x - 200.0 * tuning.air_resistance * 0.7).abs() < 1e-3);

        let mut candy = free_candy(Vec2::new(795.0, 300.0), Vec2::new(200.0, 0.0));
        candy.update(&[], DT, CANVAS, &tuning);
        assert_eq!(candy.pos.x, 785.0);
        assert!(candy.vel.x < 0.0);
    }
}

// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility types

use std::ops::Mul;

#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Self) -> f32 {
        (self.x * other.y) - (self.y * other.x)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

/// A linear function of device position: `a * x + b * y + c`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Plane {
    pub const fn constant(c: f32) -> Self {
        Self { a: 0.0, b: 0.0, c }
    }

    /// Plane through three samples. Falls back to the first sample's value
    /// when the points are collinear.
    pub fn fit_triangle(p: [Vec2; 3], f: [f32; 3]) -> Self {
        let e1 = p[1] - p[0];
        let e2 = p[2] - p[0];
        let det = e1.cross(e2);
        if det == 0.0 {
            return Self::constant(f[0]);
        }
        let df1 = f[1] - f[0];
        let df2 = f[2] - f[0];
        let a = (df1 * e2.y - df2 * e1.y) / det;
        let b = (df2 * e1.x - df1 * e2.x) / det;
        Self::through(p[0], f[0], a, b)
    }

    /// Plane varying only along the segment `p0 -> p1`.
    pub fn fit_segment(p0: Vec2, p1: Vec2, f0: f32, f1: f32) -> Self {
        let d = p1 - p0;
        let len2 = d.length_squared();
        if len2 == 0.0 {
            return Self::constant(f0);
        }
        let g = (f1 - f0) / len2;
        Self::through(p0, f0, g * d.x, g * d.y)
    }

    fn through(p: Vec2, f: f32, a: f32, b: f32) -> Self {
        Self {
            a,
            b,
            c: f - a * p.x - b * p.y,
        }
    }

    pub fn eval(&self, p: Vec2) -> f32 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// The same plane with its constant term taken at `origin`.
    pub fn rebased(&self, origin: Vec2) -> Self {
        Self {
            a: self.a,
            b: self.b,
            c: self.eval(origin),
        }
    }

    pub fn scaled(&self, s: f32) -> Self {
        Self {
            a: self.a * s,
            b: self.b * s,
            c: self.c * s,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.a, self.b, self.c]
    }
}

#[cfg(test)]
mod tests {
    use super::{Plane, Vec2};

    #[test]
    fn triangle_plane_reproduces_samples() {
        let p = [Vec2::new(1.0, 2.0), Vec2::new(9.0, 3.0), Vec2::new(4.0, 11.0)];
        let f = [0.25, 0.5, 1.0];
        let plane = Plane::fit_triangle(p, f);
        for (p, f) in p.iter().zip(f) {
            assert!((plane.eval(*p) - f).abs() < 1e-5);
        }
    }

    #[test]
    fn segment_plane_is_flat_across_the_segment() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(10.0, 0.0);
        let plane = Plane::fit_segment(p0, p1, 1.0, 3.0);
        assert!((plane.a - 0.2).abs() < 1e-6);
        assert_eq!(0.0, plane.b);
        assert!((plane.eval(Vec2::new(10.0, 50.0)) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn collinear_falls_back_to_constant() {
        let p = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        assert_eq!(Plane::constant(5.0), Plane::fit_triangle(p, [5.0, 6.0, 7.0]));
    }
}

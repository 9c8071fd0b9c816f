use bevy::math::Vec3;
use bevy::math::curve::{Curve, EaseFunction, EasingCurve};

/// Values that can be interpolated by a tween.
pub trait Blend: Copy {
    fn blend(&self, other: &Self, t: f32) -> Self;
}

impl Blend for f32 {
    fn blend(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Blend for Vec3 {
    fn blend(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

/// Sample an easing function at linear progress `t`, clamped to `0..=1`.
pub fn ease(function: EaseFunction, t: f32) -> f32 {
    EasingCurve::new(0.0_f32, 1.0, function).sample_clamped(t)
}

/// Time-stepped interpolation between two values.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration_ms: f64,
    elapsed_ms: f64,
    function: EaseFunction,
}

impl<T: Blend> Tween<T> {
    pub fn new(from: T, to: T, duration_ms: f64, function: EaseFunction) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            function,
        }
    }

    /// Step forward by `dt_ms`; returns true once the tween has finished.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.is_finished()
    }

    /// Linear progress in `0..=1`.
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn eased_progress(&self) -> f32 {
        ease(self.function, self.progress())
    }

    pub fn value(&self) -> T {
        self.from.blend(&self.to, self.eased_progress())
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// A value that either eases toward its target or, without an easing
/// facility, jumps to it immediately.
#[derive(Debug, Clone)]
pub struct Animated<T> {
    value: T,
    tween: Option<Tween<T>>,
    easing: Option<EaseFunction>,
}

impl<T: Blend> Animated<T> {
    pub fn new(value: T, easing: Option<EaseFunction>) -> Self {
        Self {
            value,
            tween: None,
            easing,
        }
    }

    pub fn animate_to(&mut self, target: T, duration_ms: f64) {
        match self.easing {
            Some(function) if duration_ms > 0.0 => {
                self.tween = Some(Tween::new(self.value, target, duration_ms, function));
            }
            _ => {
                self.value = target;
                self.tween = None;
            }
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };

        let finished = tween.advance(dt_ms);
        self.value = tween.value();
        if finished {
            self.value = tween.target();
            self.tween = None;
        }
    }

    pub fn current(&self) -> T {
        self.value
    }

    pub fn target(&self) -> T {
        self.tween.as_ref().map_or(self.value, Tween::target)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_in_out_is_symmetric_and_bounded() {
        let function = EaseFunction::CubicInOut;
        assert!(ease(function, 0.0).abs() < 1e-6);
        assert!((ease(function, 1.0) - 1.0).abs() < 1e-6);
        assert!((ease(function, 0.5) - 0.5).abs() < 1e-4);
        assert!(ease(function, 0.25) < 0.25);
        assert!((ease(function, 2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tween_reaches_target_after_duration() {
        let mut tween = Tween::new(0.0_f32, 10.0, 1000.0, EaseFunction::CubicInOut);
        assert!(!tween.advance(400.0));
        assert!(tween.value() > 0.0 && tween.value() < 10.0);
        assert!(tween.advance(600.0));
        assert!((tween.value() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn animated_without_easing_assigns_immediately() {
        let mut value = Animated::new(Vec3::ZERO, None);
        value.animate_to(Vec3::ONE, 2000.0);
        assert_eq!(value.current(), Vec3::ONE);
        assert!(!value.is_animating());
    }

    #[test]
    fn animated_with_easing_converges() {
        let mut value = Animated::new(1.0_f32, Some(EaseFunction::CubicInOut));
        value.animate_to(3.0, 500.0);
        assert_eq!(value.current(), 1.0);
        assert_eq!(value.target(), 3.0);
        value.advance(250.0);
        assert!(value.current() > 1.0 && value.current() < 3.0);
        value.advance(250.0);
        assert_eq!(value.current(), 3.0);
        assert!(!value.is_animating());
    }
}

use crate::settings::BirdSettings;

use super::collision::Rect;

/// What happened to the bird during one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    Ceiling,
    Floor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub velocity: f64,
    /// Radians, derived from velocity. Only the renderer reads it.
    pub rotation: f64,
    start_y: f64,
    gravity: f64,
    flap_velocity: f64,
}

impl Bird {
    pub fn new(settings: &BirdSettings) -> Self {
        Self {
            x: settings.x,
            y: settings.start_y,
            width: settings.width,
            height: settings.height,
            velocity: 0.0,
            rotation: 0.0,
            start_y: settings.start_y,
            gravity: settings.gravity,
            flap_velocity: settings.flap_velocity,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Overwrites the velocity with the flap impulse.
    pub fn flap(&mut self) {
        self.velocity = self.flap_velocity;
    }

    /// One semi-implicit Euler step, then the floor/ceiling policy.
    pub fn advance(&mut self, floor: f64) -> Contact {
        self.velocity += self.gravity;
        self.y += self.velocity;
        self.rotation = (self.velocity / 10.0).clamp(-0.5, 1.5);

        if self.y + self.height >= floor {
            self.y = floor - self.height;
            return Contact::Floor;
        }
        if self.y <= 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            return Contact::Ceiling;
        }
        Contact::None
    }

    pub fn reset(&mut self) {
        self.y = self.start_y;
        self.velocity = 0.0;
        self.rotation = 0.0;
    }
}

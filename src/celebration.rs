use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;
use std::time::Duration;

pub const BURST_PARTICLES: usize = 20;
pub const SHOWER_PARTICLES: usize = 50;
pub const SHOWER_STAGGER: Duration = Duration::from_millis(50);

const MAX_AGE_SECS: f64 = 3.0;
const GRAVITY: f64 = 15.0;

pub const PALETTE: [Color; 6] = [
    Color::Rgb(0xFF, 0x6B, 0x6B),
    Color::Rgb(0xFF, 0xD9, 0x3D),
    Color::Rgb(0x6B, 0xCB, 0x77),
    Color::Rgb(0x4E, 0xCD, 0xC4),
    Color::Rgb(0xFF, 0x6B, 0x9D),
    Color::Rgb(0xC6, 0x9F, 0xFF),
];

const SYMBOLS: [char; 5] = ['■', '▲', '●', '◆', '✦'];

/// One piece of confetti
#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color: Color,
    pub age: f64,
    /// Seconds until the particle appears
    pub delay: f64,
}

impl ConfettiParticle {
    fn spawn<R: Rng>(rng: &mut R, x: f64, y: f64, delay: f64) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'■'),
            color: *PALETTE.choose(rng).unwrap_or(&PALETTE[0]),
            age: 0.0,
            delay,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.delay <= 0.0
    }

    fn update(&mut self, dt: f64) -> bool {
        if self.delay > 0.0 {
            self.delay -= dt;
            return true;
        }
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < MAX_AGE_SECS
    }
}

/// Confetti overlay drawn above whichever screen is active
#[derive(Debug)]
pub struct Confetti {
    pub particles: Vec<ConfettiParticle>,
    width: f64,
    height: f64,
}

impl Confetti {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            particles: Vec::new(),
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Small pop from the middle of the screen
    pub fn burst(&mut self, count: usize) {
        let mut rng = rand::thread_rng();
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        for _ in 0..count {
            let x = cx + rng.gen_range(-6.0..6.0);
            let y = cy + rng.gen_range(-2.0..2.0);
            self.particles.push(ConfettiParticle::spawn(&mut rng, x, y, 0.0));
        }
    }

    /// Particles released along the top edge, one every `SHOWER_STAGGER`
    pub fn shower(&mut self, count: usize) {
        let mut rng = rand::thread_rng();
        let stagger = SHOWER_STAGGER.as_secs_f64();
        let right = self.width.max(1.0);
        for i in 0..count {
            let x = rng.gen_range(0.0..right);
            let mut particle = ConfettiParticle::spawn(&mut rng, x, 0.0, stagger * i as f64);
            particle.vel_y = rng.gen_range(0.0..2.0);
            self.particles.push(particle);
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        let buffer = 5.0;
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            let off_screen = particle.y > height + buffer
                || particle.x < -buffer
                || particle.x > width + buffer;
            alive && !off_screen
        });
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

use rand::Rng;

/// One drifting translucent circle
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub dx: f64,
    pub dy: f64,
    /// Hue in degrees; drawn at 70% saturation and 70% lightness
    pub hue: f64,
}

impl Blob {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height,
            r: 60.0 + rng.gen::<f64>() * 40.0,
            dx: rng.gen::<f64>() * 1.5 - 0.75,
            dy: rng.gen::<f64>() * 1.5 - 0.75,
            hue: rng.gen::<f64>() * 360.0,
        }
    }

    /// Move one frame, bouncing off the edges
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.dx;
        self.y += self.dy;

        if self.x < 0.0 || self.x > width {
            self.dx = -self.dx;
        }
        if self.y < 0.0 || self.y > height {
            self.dy = -self.dy;
        }
    }

    /// Fill colour as 8-bit RGB
    pub fn rgb(&self) -> (u8, u8, u8) {
        hsl_to_rgb(self.hue, 0.7, 0.7)
    }
}

/// The decorative layer behind the list. Knows nothing about tasks.
#[derive(Debug, Clone)]
pub struct Background {
    pub blobs: Vec<Blob>,
    pub width: f64,
    pub height: f64,
}

impl Background {
    pub fn new<R: Rng>(rng: &mut R, count: usize, width: f64, height: f64) -> Self {
        let blobs = (0..count).map(|_| Blob::random(rng, width, height)).collect();
        Self { blobs, width, height }
    }

    /// Advance every blob by one frame
    pub fn step(&mut self) {
        for blob in &mut self.blobs {
            blob.step(self.width, self.height);
        }
    }

    /// Change the drawing bounds. Blobs stay where they are.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

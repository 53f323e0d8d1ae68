use foundation::math::{Mat4, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Position where `ray` crosses the plane at height `z`.
///
/// Returns the origin when `z` is NaN, when the origin already sits at `z`,
/// or when the ray is parallel to the plane.
pub fn ray_position_at_z(ray: &Ray, z: f64) -> Vec3 {
    if z.is_nan() || z == ray.origin.z || ray.dir.z == 0.0 {
        return ray.origin;
    }
    let t = (z - ray.origin.z) / ray.dir.z;
    Vec3::new(ray.origin.x + t * ray.dir.x, ray.origin.y + t * ray.dir.y, z)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Pixel to normalized image-plane coordinates.
    ///
    /// The shorter side spans [-1, 1]; y grows upward.
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let min = w.min(h).max(1.0);
        ((2.0 * x - w) / min, (h - 2.0 * y) / min)
    }

    /// Inverse of [`Viewport::normalize`].
    pub fn denormalize(&self, nx: f64, ny: f64) -> (f64, f64) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let min = w.min(h).max(1.0);
        ((nx * min + w) / 2.0, (h - ny * min) / 2.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Projection {
    Parallel,
    Perspective,
}

/// Radius that bounds every displayable point (top of the vertical range).
const DISPLAY_BOUND: f64 = 2.0;

/// Builds pick rays for screen pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayCaster {
    pub viewport: Viewport,
    pub projection: Projection,
    pub field_of_view_deg: f64,
}

impl RayCaster {
    pub fn new(viewport: Viewport, projection: Projection, field_of_view_deg: f64) -> Self {
        Self {
            viewport,
            projection,
            field_of_view_deg,
        }
    }

    /// Distance from the image plane to the eye.
    pub fn eye_distance(&self) -> f64 {
        1.0 / (self.field_of_view_deg.to_radians() / 2.0).tan()
    }

    /// Ray in view space, before the camera transform is undone.
    pub fn view_ray(&self, x: f64, y: f64) -> Ray {
        let (nx, ny) = self.viewport.normalize(x, y);
        let d = self.eye_distance();
        match self.projection {
            Projection::Parallel => Ray::new(Vec3::new(nx, ny, d), Vec3::new(0.0, 0.0, -1.0)),
            Projection::Perspective => Ray::new(Vec3::new(0.0, 0.0, d), Vec3::new(nx, ny, -d)),
        }
    }

    /// Ray in display space, or `None` when `camera` is not invertible.
    ///
    /// Parallel rays have no physical eye, so their origin is moved back
    /// along the ray until it lies in front of the whole display volume.
    pub fn world_ray(&self, camera: &Mat4, x: f64, y: f64) -> Option<Ray> {
        let inv = camera.inverse()?;
        let view = self.view_ray(x, y);
        let dir = inv.transform_vector(view.dir).normalize();
        if dir == Vec3::ZERO {
            return None;
        }
        let mut origin = inv.transform_point(view.origin);
        if self.projection == Projection::Parallel {
            let ahead = origin.dot(dir) + DISPLAY_BOUND;
            if ahead > 0.0 {
                origin = origin - dir * ahead;
            }
        }
        Some(Ray::new(origin, dir))
    }

    /// Pixel where display-space point `p` appears, the inverse of
    /// [`RayCaster::world_ray`].
    ///
    /// `None` for non-finite points and, in perspective, for points at or
    /// behind the eye plane.
    pub fn project(&self, camera: &Mat4, p: Vec3) -> Option<(f64, f64)> {
        if !p.is_finite() {
            return None;
        }
        let v = camera.transform_point(p);
        let (nx, ny) = match self.projection {
            Projection::Parallel => (v.x, v.y),
            Projection::Perspective => {
                let d = self.eye_distance();
                let depth = d - v.z;
                if depth <= 0.0 {
                    return None;
                }
                (v.x * d / depth, v.y * d / depth)
            }
        };
        Some(self.viewport.denormalize(nx, ny))
    }
}

/// Surface a pick ray is intersected with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Manifold {
    Sphere { radius: f64 },
    Plane { z: f64 },
}

impl Manifold {
    pub const GLOBE: Self = Manifold::Sphere { radius: 1.0 };

    /// Smallest `t >= 0` where the ray meets the manifold.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match *self {
            Manifold::Sphere { radius } => {
                let a = ray.dir.dot(ray.dir);
                if a == 0.0 {
                    return None;
                }
                let b = ray.origin.dot(ray.dir);
                let c = ray.origin.dot(ray.origin) - radius * radius;
                let disc = b * b - a * c;
                if !(disc >= 0.0) {
                    return None;
                }
                let sq = disc.sqrt();
                let near = (-b - sq) / a;
                let far = (-b + sq) / a;
                if near >= 0.0 {
                    Some(near)
                } else if far >= 0.0 {
                    Some(far)
                } else {
                    None
                }
            }
            Manifold::Plane { z } => {
                if ray.dir.z == 0.0 {
                    return None;
                }
                let t = (z - ray.origin.z) / ray.dir.z;
                (t >= 0.0).then_some(t)
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Pick {
    Hit(Vec3),
    NoIntersection,
}

impl Pick {
    pub fn point(self) -> Option<Vec3> {
        match self {
            Pick::Hit(p) => Some(p),
            Pick::NoIntersection => None,
        }
    }
}

/// Display-space point under pixel `(x, y)`.
pub fn pick_ray(caster: &RayCaster, camera: &Mat4, manifold: Manifold, x: f64, y: f64) -> Pick {
    let Some(ray) = caster.world_ray(camera, x, y) else {
        return Pick::NoIntersection;
    };
    match manifold.intersect(&ray) {
        Some(t) => Pick::Hit(ray.at(t)),
        None => Pick::NoIntersection,
    }
}

/// Like [`pick_ray`], with z replaced by `depth` unless `depth` is NaN.
pub fn pick_ray_with_fixed_depth(
    caster: &RayCaster,
    camera: &Mat4,
    manifold: Manifold,
    x: f64,
    y: f64,
    depth: f64,
) -> Pick {
    match pick_ray(caster, camera, manifold, x, y) {
        Pick::Hit(p) if !depth.is_nan() => Pick::Hit(Vec3::new(p.x, p.y, depth)),
        other => other,
    }
}

/// Rotation matrix for transforming Galactic coordinates to ICRS.
///
/// IAU 1958 Galactic system expressed in ICRS:
/// - North Galactic Pole (NGP): RA = 192.859508°, Dec = 27.128336°
/// - Galactic Center direction (l=0°, b=0°): RA = 266.405°, Dec = -28.936°
///
/// Rows are the Galactic basis vectors in ICRS components, so `gal = M · icrs`
/// and `icrs = Mᵀ · gal`.
///
/// Reference: Liu, J.-C., Zhu, Z., & Zhang, H. (2011), A&A 526, A16; ERFA `eraG2icrs`.
#[allow(clippy::excessive_precision)]
pub const GALACTIC_TO_ICRS: [[f64; 3]; 3] = [
    [
        -0.054875560416215368492398900454,
        -0.873437090234885048760383168409,
        -0.483835015548713226831774175116,
    ],
    [
        0.494109427875583673525222371358,
        -0.444829629960011178146614061616,
        0.746982244497218890527388004556,
    ],
    [
        -0.867666149019004701181616534570,
        -0.198076373431201528180486091412,
        0.455983776175066922272100478348,
    ],
];

/// `distance_pc = PARALLAX_DISTANCE_PRODUCT / parallax_mas`
pub const PARALLAX_DISTANCE_PRODUCT: f64 = 1000.0;

/// Allowed gap between a supplied distance and the one implied by a supplied parallax.
pub const DISTANCE_TOLERANCE_PC: f64 = 1e-5;

/// Allowed per-component gap between two independently obtained centers.
pub const CENTER_TOLERANCE_PC: f64 = 0.1;

pub const DEG_PER_RAD: f64 = 180.0 / std::f64::consts::PI;
pub const RAD_PER_DEG: f64 = std::f64::consts::PI / 180.0;

pub const LY_TO_PC: f64 = 0.3066013937;
pub const AU_TO_PC: f64 = 4.84813681109536e-6;

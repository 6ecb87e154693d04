/// Texture filtering, applied as a texture parameter whenever a texture is (re)created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerType {
    ///Nearest-neighbor sampling.  Crisp pixels when scaled.
    #[default]
    Nearest,
    ///Bilinear filtering.
    Linear,
}

/// Addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

//! WGSL source for the preview pass.
//! Used by the wgpu backend when the `wgpu` feature is enabled.

#![cfg_attr(not(feature = "wgpu"), allow(dead_code))]

/// Integer planes: codes normalized by `2^bit_depth - 1`.
const INTEGER_PLANES: &str = r#"
const FLOAT_SAMPLES: bool = false;

@group(0) @binding(0) var plane0: texture_2d<u32>;
@group(0) @binding(1) var plane1: texture_2d<u32>;
@group(0) @binding(2) var plane2: texture_2d<u32>;

fn load_plane(t: texture_2d<u32>, uv: vec2<f32>) -> f32 {
    let dims = textureDimensions(t);
    let texel = min(vec2<u32>(uv * vec2<f32>(dims)), dims - vec2<u32>(1u));
    let max_code = f32((1u << params.bit_depth) - 1u);
    return f32(textureLoad(t, texel, 0).r) / max_code;
}
"#;

/// Float planes: already normalized.
const FLOAT_PLANES: &str = r#"
const FLOAT_SAMPLES: bool = true;

@group(0) @binding(0) var plane0: texture_2d<f32>;
@group(0) @binding(1) var plane1: texture_2d<f32>;
@group(0) @binding(2) var plane2: texture_2d<f32>;

fn load_plane(t: texture_2d<f32>, uv: vec2<f32>) -> f32 {
    let dims = textureDimensions(t);
    let texel = min(vec2<u32>(uv * vec2<f32>(dims)), dims - vec2<u32>(1u));
    return textureLoad(t, texel, 0).r;
}
"#;

/// Quad, range expansion, Y'CbCr matrix and LUT lookup.
const COMMON: &str = r#"
struct Params {
    color_space: u32,   // 0 rgb, 1 bt601, 2 bt709, 3 bt2020
    color_range: u32,   // 0 limited, 1 full
    bit_depth: u32,
    _pad: u32,
}

@group(0) @binding(3) var lut: texture_3d<f32>;
@group(0) @binding(4) var lut_sampler: sampler;
@group(0) @binding(5) var<uniform> params: Params;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

// Triangle strip over the viewport: uv (0,0) (1,0) (0,1) (1,1).
@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VsOut {
    let uv = vec2<f32>(f32(vi & 1u), f32(vi >> 1u));
    var out: VsOut;
    out.position = vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

// One 8-bit reference code step in normalized units.
fn code_scale() -> f32 {
    if FLOAT_SAMPLES {
        return 1.0 / 255.0;
    }
    let bits = f32(params.bit_depth);
    return exp2(bits - 8.0) / (exp2(bits) - 1.0);
}

fn chroma_mid() -> f32 {
    if FLOAT_SAMPLES {
        return 0.5;
    }
    let bits = f32(params.bit_depth);
    return exp2(bits - 1.0) / (exp2(bits) - 1.0);
}

// Limited range: luma 16..235, chroma 16..240 (8-bit codes, scaled by depth).
fn expand_range(v: vec3<f32>) -> vec3<f32> {
    let s = code_scale();
    if params.color_space == 0u {
        if params.color_range == 1u {
            return v;
        }
        return (v - vec3<f32>(16.0 * s)) / (219.0 * s);
    }
    if params.color_range == 1u {
        return vec3<f32>(v.x, v.yz - vec2<f32>(chroma_mid()));
    }
    let y = (v.x - 16.0 * s) / (219.0 * s);
    let c = (v.yz - vec2<f32>(128.0 * s)) / (224.0 * s);
    return vec3<f32>(y, c);
}

fn ycbcr_to_rgb(ycc: vec3<f32>) -> vec3<f32> {
    var kr = 0.299;
    var kb = 0.114;
    if params.color_space == 2u {
        kr = 0.2126;
        kb = 0.0722;
    } else if params.color_space == 3u {
        kr = 0.2627;
        kb = 0.0593;
    }
    let kg = 1.0 - kr - kb;
    let r = ycc.x + 2.0 * (1.0 - kr) * ycc.z;
    let b = ycc.x + 2.0 * (1.0 - kb) * ycc.y;
    let g = (ycc.x - kr * r - kb * b) / kg;
    return vec3<f32>(r, g, b);
}

@fragment
fn fs_main(input: VsOut) -> @location(0) vec4<f32> {
    let v = vec3<f32>(
        load_plane(plane0, input.uv),
        load_plane(plane1, input.uv),
        load_plane(plane2, input.uv),
    );
    var rgb = expand_range(v);
    if params.color_space != 0u {
        rgb = ycbcr_to_rgb(rgb);
    }
    rgb = clamp(rgb, vec3<f32>(0.0), vec3<f32>(1.0));

    // Texture x is blue (fastest cube axis); sample texel centers.
    let n = f32(textureDimensions(lut).x);
    let coord = (rgb.bgr * (n - 1.0) + vec3<f32>(0.5)) / n;
    let mapped = textureSampleLevel(lut, lut_sampler, coord, 0.0).rgb;
    return vec4<f32>(mapped, 1.0);
}
"#;

/// Full WGSL module for integer or float planes.
pub(crate) fn preview_source(float_planes: bool) -> String {
    let planes = if float_planes { FLOAT_PLANES } else { INTEGER_PLANES };
    format!("{planes}{COMMON}")
}

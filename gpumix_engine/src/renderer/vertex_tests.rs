//! Unit tests for vertex.rs

use crate::renderer::{TextureFormat, Vertex};

#[test]
fn test_vertex_stride_is_16() {
    assert_eq!(Vertex::STRIDE, 16);
}

#[test]
fn test_vertex_attributes_layout() {
    let attrs = Vertex::attributes();
    assert_eq!(attrs[0].location, 0);
    assert_eq!(attrs[0].offset, 0);
    assert_eq!(attrs[0].format, TextureFormat::R32G32_SFLOAT);
    assert_eq!(attrs[1].location, 1);
    assert_eq!(attrs[1].offset, 8);
}

#[test]
fn test_quad_is_triangle_strip_order() {
    let quad = Vertex::QUAD;
    assert_eq!(quad[0], Vertex::new(-0.7, -0.7, -0.1, -0.1));
    assert_eq!(quad[1], Vertex::new(-0.7, 0.7, -0.1, 1.1));
    assert_eq!(quad[2], Vertex::new(0.7, -0.7, 1.1, -0.1));
    assert_eq!(quad[3], Vertex::new(0.7, 0.7, 1.1, 1.1));
}

#[test]
fn test_as_bytes_packs_floats() {
    let bytes = Vertex::as_bytes(&Vertex::QUAD);
    assert_eq!(bytes.len(), 64);
    let first = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(first, -0.7);
    let u1 = f32::from_ne_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);
    assert_eq!(u1, -0.1);
}

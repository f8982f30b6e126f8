use std::mem::size_of;

use glow::HasContext;

/// One float attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    /// Offset from the start of the vertex, in floats
    pub offset: usize,
}

/// Interleaved `f32` vertex layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    /// Floats per vertex
    stride: usize,
}

impl VertexLayout {
    /// Build a tightly packed layout; attribute `i` goes to location `i`
    pub fn packed(components: &[i32]) -> Self {
        let mut offset = 0;
        let attributes = components
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let attribute = VertexAttribute {
                    location: i as u32,
                    components: count,
                    offset,
                };
                offset += count as usize;
                attribute
            })
            .collect();
        Self {
            attributes,
            stride: offset,
        }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn stride_bytes(&self) -> i32 {
        (self.stride * size_of::<f32>()) as i32
    }

    pub fn vertex_count(&self, data: &[f32]) -> usize {
        if self.stride == 0 {
            0
        } else {
            data.len() / self.stride
        }
    }
}

/// Vertex array + buffer holding non-indexed triangles
#[derive(Debug)]
pub struct Mesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

impl Mesh {
    pub fn new(gl: &glow::Context, vertices: &[f32], layout: &VertexLayout) -> Result<Self, String> {
        if layout.stride() == 0 || vertices.len() % layout.stride() != 0 {
            return Err(format!(
                "{} floats do not divide into vertices of {} floats",
                vertices.len(),
                layout.stride()
            ));
        }

        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            let stride = layout.stride_bytes();
            for attribute in layout.attributes() {
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    stride,
                    (attribute.offset * size_of::<f32>()) as i32,
                );
                gl.enable_vertex_attrib_array(attribute.location);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                vao,
                vbo,
                vertex_count: layout.vertex_count(vertices) as i32,
            })
        }
    }

    pub fn draw(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count);
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

//! Runs against a real window, so it needs a display and an OpenGL 4.3 driver.
//! Use `cargo test -- --ignored` to run it.

extern crate gl;
extern crate pastel;

use pastel::prelude::*;

unsafe fn binding(name: gl::types::GLenum) -> i32 {
    let mut v = 0;
    gl::GetIntegerv(name, &mut v);
    v
}

#[test]
#[ignore]
fn failures_leave_nothing_bound() {
    let ctx = Context::init(Params::default()).unwrap();
    let mut video = Device::new(&ctx).unwrap();

    let width = unsafe { binding(gl::MAX_TEXTURE_SIZE) } as u32 + 1;
    let pixels = vec![0u8; width as usize];
    match make_texture(&mut video, width, 1, 1, &pixels) {
        Err(Error::Backend(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    unsafe {
        assert_eq!(binding(gl::TEXTURE_BINDING_2D), 0);
        assert_eq!(gl::GetError(), gl::NO_ERROR);
    }

    let texture = make_texture(&mut video, 1, 1, 1, &[0]).unwrap();
    assert_eq!(unsafe { gl::IsTexture(texture.handle()) }, gl::TRUE);

    let vertices = [Vertex::default(); 3];
    let geometry = make_geometry(&mut video, &vertices, &[0, 1, 2]).unwrap();
    unsafe {
        assert_eq!(binding(gl::VERTEX_ARRAY_BINDING), 0);
        assert_eq!(binding(gl::ARRAY_BUFFER_BINDING), 0);
        assert_eq!(gl::IsVertexArray(geometry.vao()), gl::TRUE);
    }

    match make_shader(&mut video, "void main() {}", "not glsl") {
        Err(Error::ShaderCompile(stage, _)) => assert_eq!(stage, "Fragment"),
        other => panic!("unexpected {:?}", other),
    }

    unsafe { assert_eq!(gl::GetError(), gl::NO_ERROR) };

    drop(video);
    ctx.term();
}

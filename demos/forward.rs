//! A forward-lit scene: a textured cube lit by a directional light, a quad
//! seen through the camera and a triangle drawn straight in clip space.

extern crate env_logger;
#[macro_use]
extern crate log;
extern crate pastel;

use std::fs;
use std::path::{Path, PathBuf};

use pastel::prelude::*;
use pastel::math::perspective;

// Uniform slots shared by every program of this demo.
const PROJ: u32 = 0;
const VIEW: u32 = 1;
const MODEL: u32 = 2;
const MAIN_TEXTURE: u32 = 3;
const TIME: u32 = 4;
const AMBIENT: u32 = 5;
const LIGHT_DIFFUSE: u32 = 6;
const LIGHT_DIRECTION: u32 = 7;

const BASIC_VS: &str = "#version 430
layout (location = 0) in vec4 position;
layout (location = 1) in vec4 color;
layout (location = 2) in vec2 uv;

out vec4 vColor;
out vec2 vUV;

void main() {
    gl_Position = position;
    vColor = color;
    vUV = uv;
}
";

const BASIC_FS: &str = "#version 430
in vec4 vColor;
in vec2 vUV;

out vec4 outputColor;

layout (location = 3) uniform sampler2D mainTexture;
layout (location = 4) uniform float time;

void main() {
    float pulse = 0.75 + 0.25 * sin(time);
    outputColor = texture(mainTexture, vUV) * vColor * pulse;
}
";

const MVP_VS: &str = "#version 430
layout (location = 0) in vec4 position;
layout (location = 1) in vec4 color;
layout (location = 2) in vec2 uv;

layout (location = 0) uniform mat4 proj;
layout (location = 1) uniform mat4 view;
layout (location = 2) uniform mat4 model;

out vec4 vColor;
out vec2 vUV;

void main() {
    gl_Position = proj * view * model * position;
    vColor = color;
    vUV = uv;
}
";

fn triangle() -> [Vertex; 3] {
    let n = [0.0, 0.0, -1.0, 0.0];
    [
        Vertex::new([-0.5, -0.5, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0], [0.0, 0.0], n),
        Vertex::new([0.5, -0.5, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [1.0, 0.0], n),
        Vertex::new([0.0, 0.5, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [0.5, 1.0], n),
    ]
}

fn quad() -> [Vertex; 4] {
    let n = [0.0, 0.0, -1.0, 0.0];
    let c = [1.0; 4];
    [
        Vertex::new([-1.0, -1.0, 0.0, 1.0], c, [0.0, 0.0], n),
        Vertex::new([1.0, -1.0, 0.0, 1.0], c, [1.0, 0.0], n),
        Vertex::new([-1.0, 1.0, 0.0, 1.0], c, [0.0, 1.0], n),
        Vertex::new([1.0, 1.0, 0.0, 1.0], c, [1.0, 1.0], n),
    ]
}

fn res() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("res")
}

/// Checks the slot constants against the declarations of every program.
fn verify(lit_vs: &str, lit_fs: &str) -> Result<()> {
    use pastel::video::uniform::UniformVariableType as T;

    let mvp = [(PROJ, T::Matrix4f), (VIEW, T::Matrix4f), (MODEL, T::Matrix4f)];
    verify_slots(MVP_VS, &mvp)?;
    verify_slots(lit_vs, &mvp)?;
    verify_slots(BASIC_FS, &[(MAIN_TEXTURE, T::Texture), (TIME, T::F32)])?;
    verify_slots(
        lit_fs,
        &[
            (MAIN_TEXTURE, T::Texture),
            (AMBIENT, T::Vector3f),
            (LIGHT_DIFFUSE, T::Vector3f),
            (LIGHT_DIRECTION, T::Vector3f),
        ],
    )
}

fn run() -> Result<()> {
    let res = res();

    let config = res.join("forward.json");
    let params = if config.is_file() {
        Params::load(&config)?
    } else {
        Params::default()
    };

    let lit_vs = res.join("shaders").join("lit.vert");
    let lit_fs = res.join("shaders").join("lit.frag");
    let read = |path: &Path| {
        fs::read_to_string(path)
            .map_err(|err| Error::ResourceNotFound(path.to_owned(), format!("{}", err)))
    };

    verify(&read(&lit_vs)?, &read(&lit_fs)?)?;

    let ctx = Context::init(params)?;
    let mut video = Device::new(&ctx)?;

    {
        let mut scope = VideoGuard::new(&mut video);

        let triangle = scope.make_geometry(&triangle(), &[2, 0, 1])?;
        let quad = scope.make_geometry(&quad(), &[3, 2, 0, 0, 1, 3])?;
        let cube = scope.load_geometry(res.join("cube.obj"))?;
        let checker = scope.load_texture(res.join("checker.ppm"))?;

        let basic = scope.make_shader(BASIC_VS, BASIC_FS)?;
        let mvp = scope.make_shader(MVP_VS, BASIC_FS)?;
        let lit = scope.load_shader(&lit_vs, &lit_fs)?;

        let sun = Light::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));

        let dimensions = ctx.dimensions();
        let aspect = dimensions.x as f32 / dimensions.y.max(1) as f32;
        let proj = perspective(Deg(80.0f32), aspect, 0.1, 100.0);
        let view = Matrix4::look_at(
            Point3::new(1.0, 1.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );

        for shader in &[&mvp, &lit] {
            scope.set_uniform(shader, PROJ, proj)?;
            scope.set_uniform(shader, VIEW, view)?;
        }

        let behind = Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.0));
        scope.set_uniform(&mvp, MODEL, behind)?;
        scope.set_texture(&mvp, MAIN_TEXTURE, &checker, 0)?;
        scope.set_texture(&basic, MAIN_TEXTURE, &checker, 0)?;

        scope.set_texture(&lit, MAIN_TEXTURE, &checker, 0)?;
        scope.set_uniform(&lit, AMBIENT, [0.1f32, 0.1, 0.1])?;
        scope.set_uniform(&lit, LIGHT_DIFFUSE, sun.color)?;
        scope.set_uniform(&lit, LIGHT_DIRECTION, sun.direction)?;

        ctx.reset_time(0.0);
        while !ctx.should_close() {
            ctx.tick()?;
            scope.clear(&ctx)?;

            let time = ctx.time();
            let model = Matrix4::from_angle_y(Rad(time * 0.5));
            scope.set_uniform(&lit, MODEL, model)?;
            scope.set_uniform(&basic, TIME, time)?;

            scope.draw(&mvp, &quad)?;
            scope.draw(&lit, &cube)?;
            scope.draw(&basic, &triangle)?;
        }

        info!("Releases {} video resources.", scope.len());
    }

    drop(video);
    ctx.term();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}

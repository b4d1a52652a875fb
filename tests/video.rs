extern crate pastel;

use std::fs;
use std::path::{Path, PathBuf};

use pastel::prelude::*;

fn temp(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn triangle() -> [Vertex; 3] {
    let n = [0.0, 0.0, -1.0, 0.0];
    [
        Vertex::new([-0.5, -0.5, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0], [0.0, 0.0], n),
        Vertex::new([0.5, -0.5, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [1.0, 0.0], n),
        Vertex::new([0.0, 0.5, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [0.5, 1.0], n),
    ]
}

const VS: &str = "#version 430\nlayout (location = 0) in vec4 position;\nvoid main() { gl_Position = position; }\n";
const FS: &str = "#version 430\nout vec4 color;\nlayout (location = 3) uniform sampler2D mainTexture;\nvoid main() { color = vec4(1.0); }\n";

#[test]
fn geometry_size() {
    let (mut video, journal) = Device::headless();

    let geometry = make_geometry(&mut video, &triangle(), &[2, 0, 1]).unwrap();
    assert_eq!(geometry.size(), 3);
    assert!(!geometry.is_null());
    assert!(geometry.vao() != 0 && geometry.vbo() != 0 && geometry.ibo() != 0);

    match &journal.commands()[..] {
        [Command::CreateGeometry {
            vertices, indices, ..
        }] => {
            assert_eq!(*vertices, 3);
            assert_eq!(*indices, 3);
        }
        other => panic!("unexpected {:?}", other),
    }

    let empty = make_geometry(&mut video, &triangle(), &[]).unwrap();
    assert_eq!(empty.size(), 0);
}

#[test]
fn geometry_rejects_out_of_bounds_indices() {
    let (mut video, journal) = Device::headless();

    match make_geometry(&mut video, &triangle(), &[0, 1, 3]) {
        Err(Error::IndexOutOfBounds(3, 3)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(journal.commands().is_empty());
}

#[test]
fn free_resets_and_is_idempotent() {
    let (mut video, journal) = Device::headless();

    let mut geometry = make_geometry(&mut video, &triangle(), &[0, 1, 2]).unwrap();
    let mut texture = make_texture(&mut video, 1, 1, 4, &[255; 4]).unwrap();
    let mut shader = make_shader(&mut video, VS, FS).unwrap();

    free_geometry(&mut video, &mut geometry).unwrap();
    free_texture(&mut video, &mut texture).unwrap();
    free_shader(&mut video, &mut shader).unwrap();

    assert_eq!((geometry.vao(), geometry.vbo(), geometry.ibo()), (0, 0, 0));
    assert_eq!(geometry.size(), 0);
    assert_eq!(texture.handle(), 0);
    assert_eq!(shader.program(), 0);

    journal.clear();
    free_geometry(&mut video, &mut geometry).unwrap();
    free_texture(&mut video, &mut texture).unwrap();
    free_shader(&mut video, &mut shader).unwrap();
    assert!(journal.commands().is_empty());
}

#[test]
fn texture_channels() {
    let (mut video, journal) = Device::headless();

    let pixels = [7u8; 16];
    for channels in 1..5 {
        let texture = make_texture(&mut video, 2, 2, channels, &pixels).unwrap();
        assert_eq!(texture.channels(), channels);
        assert_eq!((texture.width(), texture.height()), (2, 2));
    }

    let formats: Vec<_> = journal
        .commands()
        .into_iter()
        .filter_map(|v| match v {
            Command::CreateTexture { format, .. } => Some(format),
            _ => None,
        })
        .collect();

    assert_eq!(
        formats,
        [
            TextureFormat::R8,
            TextureFormat::RG8,
            TextureFormat::RGB8,
            TextureFormat::RGBA8
        ]
    );

    for &channels in &[0, 5] {
        match make_texture(&mut video, 2, 2, channels, &pixels) {
            Err(Error::ChannelCount(v)) => assert_eq!(v, channels),
            other => panic!("unexpected {:?}", other),
        }
    }

    match make_texture(&mut video, 4, 4, 4, &pixels) {
        Err(Error::PixelDataMismatch(16, 64)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match make_texture(&mut video, 65536, 65536, 4, &[]) {
        Err(Error::PixelDataMismatch(0, _)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match make_texture(&mut video, u32::max_value(), u32::max_value(), 4, &pixels) {
        Err(Error::PixelDataMismatch(16, _)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

fn bits(v: &Vertex) -> Vec<u32> {
    v.position
        .iter()
        .chain(&v.color)
        .chain(&v.uv)
        .chain(&v.normal)
        .map(|v| v.to_bits())
        .collect()
}

#[test]
fn vertex_read_back() {
    let (mut video, _) = Device::headless();

    let vertices = triangle();
    let geometry = make_geometry(&mut video, &vertices, &[2, 0, 1]).unwrap();
    let back = video.read_vertex_buffer(&geometry).unwrap();

    assert_eq!(back.len(), vertices.len());
    for (a, b) in back.iter().zip(vertices.iter()) {
        assert_eq!(bits(a), bits(b));
    }

    match video.read_vertex_buffer(&Geometry::default()) {
        Err(Error::NullHandle(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn triangle_end_to_end() {
    let (mut video, journal) = Device::headless();

    let geometry = make_geometry(&mut video, &triangle(), &[2, 0, 1]).unwrap();
    let shader = make_shader(&mut video, VS, FS).unwrap();

    journal.clear();
    draw(&mut video, &shader, &geometry).unwrap();

    assert_eq!(
        journal.commands(),
        [Command::Draw {
            program: shader.program(),
            vao: geometry.vao(),
            len: 3,
        }]
    );
}

#[test]
fn draw_freed_resources() {
    let (mut video, journal) = Device::headless();

    let mut geometry = make_geometry(&mut video, &triangle(), &[2, 0, 1]).unwrap();
    let mut shader = make_shader(&mut video, VS, FS).unwrap();

    free_geometry(&mut video, &mut geometry).unwrap();
    match draw(&mut video, &shader, &geometry) {
        Err(Error::NullHandle("geometry")) => {}
        other => panic!("unexpected {:?}", other),
    }

    free_shader(&mut video, &mut shader).unwrap();
    match set_uniform(&mut video, &shader, 0, 1.0f32) {
        Err(Error::NullHandle("shader")) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(!journal
        .commands()
        .iter()
        .any(|v| matches!(v, Command::Draw { .. } | Command::Uniform { .. })));
}

#[test]
fn texture_binding() {
    let (mut video, journal) = Device::headless();

    let texture = make_texture(&mut video, 1, 1, 3, &[1, 2, 3]).unwrap();
    let shader = make_shader(&mut video, VS, FS).unwrap();
    let other = make_shader(&mut video, VS, FS).unwrap();

    journal.clear();
    set_texture(&mut video, &shader, 3, &texture, 2).unwrap();

    assert_eq!(
        journal.commands(),
        [
            Command::BindTexture {
                unit: 2,
                id: texture.handle(),
            },
            Command::Uniform {
                program: shader.program(),
                location: 3,
                variable: UniformVariable::I32(2),
            },
        ]
    );

    assert!(journal.commands().iter().all(|v| match v {
        Command::Uniform { program, .. } => *program != other.program(),
        _ => true,
    }));
}

#[test]
fn uniform_values() {
    let (mut video, journal) = Device::headless();
    let shader = make_shader(&mut video, VS, FS).unwrap();

    journal.clear();
    set_uniform(&mut video, &shader, 4, 0.5f32).unwrap();
    set_uniform(&mut video, &shader, 7, Vector3::new(-1.0f32, 0.0, 0.0)).unwrap();
    set_uniform(&mut video, &shader, 2, Matrix4::<f32>::from_scale(2.0)).unwrap();

    let variables: Vec<_> = journal
        .commands()
        .into_iter()
        .filter_map(|v| match v {
            Command::Uniform {
                location, variable, ..
            } => Some((location, variable)),
            _ => None,
        })
        .collect();

    assert_eq!(variables.len(), 3);
    assert_eq!(variables[0], (4, UniformVariable::F32(0.5)));
    assert_eq!(variables[1], (7, UniformVariable::Vector3f([-1.0, 0.0, 0.0])));
    match variables[2] {
        (2, UniformVariable::Matrix4f(m, false)) => {
            assert_eq!(m[0][0], 2.0);
            assert_eq!(m[3][3], 1.0);
        }
        ref other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn shader_compile_failure() {
    let (mut video, journal) = Device::headless();

    match make_shader(&mut video, VS, "#version 430\nvoid nothing() {}\n") {
        Err(Error::ShaderCompile(stage, log)) => {
            assert_eq!(stage, "Fragment");
            assert!(!log.is_empty());
        }
        other => panic!("unexpected {:?}", other),
    }

    let commands = journal.commands();
    assert!(!commands.iter().any(|v| matches!(v, Command::Link { .. })));

    let stages = commands
        .iter()
        .filter(|v| matches!(v, Command::CompileStage { .. }))
        .count();

    let deleted = commands
        .iter()
        .filter(|v| matches!(v, Command::DeleteStage(_)))
        .count();

    assert_eq!(stages, 2);
    assert_eq!(deleted, 2);
}

#[test]
fn guard_frees_on_drop() {
    let (mut video, journal) = Device::headless();

    {
        let mut scope = VideoGuard::new(&mut video);
        scope.make_geometry(&triangle(), &[2, 0, 1]).unwrap();
        scope.make_texture(1, 1, 1, &[0]).unwrap();
        scope.make_shader(VS, FS).unwrap();

        let mut freed = scope.make_texture(1, 1, 1, &[0]).unwrap();
        scope.free_texture(&mut freed).unwrap();
        assert_eq!(scope.len(), 3);

        journal.clear();
    }

    let commands = journal.commands();
    assert_eq!(commands.len(), 3);
    assert!(commands
        .iter()
        .any(|v| matches!(v, Command::DeleteGeometry(_))));
    assert!(commands.iter().any(|v| matches!(v, Command::DeleteTexture(_))));
    assert!(commands.iter().any(|v| matches!(v, Command::DeleteProgram(_))));
}

#[test]
fn guard_frees_each_name_once() {
    let (mut video, journal) = Device::headless();

    {
        let mut scope = VideoGuard::new(&mut video);
        let mut geometry = scope.make_geometry(&triangle(), &[2, 0, 1]).unwrap();
        let shader = scope.make_shader(VS, FS).unwrap();

        scope.set_uniform(&shader, 4, 1.0f32).unwrap();
        scope.draw(&shader, &geometry).unwrap();

        scope.free_geometry(&mut geometry).unwrap();
        scope.free_geometry(&mut geometry).unwrap();
        assert_eq!(scope.len(), 1);

        match scope.draw(&shader, &geometry) {
            Err(Error::NullHandle("geometry")) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    let commands = journal.commands();
    let deleted = commands
        .iter()
        .filter(|v| matches!(v, Command::DeleteGeometry(_)))
        .count();

    assert_eq!(deleted, 1);
    assert!(matches!(commands.last(), Some(Command::DeleteProgram(_))));
}

#[test]
fn guard_frees_on_early_return() {
    fn build(video: &mut Device) -> Result<()> {
        let mut scope = VideoGuard::new(video);
        scope.make_geometry(&triangle(), &[2, 0, 1])?;
        scope.make_shader(VS, "no entry point")?;
        Ok(())
    }

    let (mut video, journal) = Device::headless();
    assert!(build(&mut video).is_err());

    let commands = journal.commands();
    assert!(matches!(commands.last(), Some(Command::DeleteGeometry(_))));
}

#[test]
fn load_resources() {
    let (mut video, _) = Device::headless();

    let obj = temp(
        "pastel_video_load_resources.obj",
        b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n",
    );

    let geometry = load_geometry(&mut video, &obj).unwrap();
    fs::remove_file(&obj).unwrap();
    assert_eq!(geometry.size(), 6);

    let back = video.read_vertex_buffer(&geometry).unwrap();
    assert_eq!(back.len(), 6);
    assert!(back.iter().all(|v| v.color == [1.0; 4]));

    let ppm = temp(
        "pastel_video_load_resources.ppm",
        b"P3\n2 1\n255\n255 0 0 0 255 0\n",
    );

    let texture = load_texture(&mut video, &ppm).unwrap();
    fs::remove_file(&ppm).unwrap();
    assert_eq!(
        (texture.width(), texture.height(), texture.channels()),
        (2, 1, 3)
    );

    match load_texture(&mut video, "no/such/texture.png") {
        Err(Error::ResourceNotFound(_, _)) => {}
        other => panic!("unexpected {:?}", other),
    }

    match load_geometry(&mut video, "no/such/model.obj") {
        Err(Error::ResourceNotFound(_, _)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn load_shader_files() {
    let (mut video, _) = Device::headless();

    let vert = temp("pastel_video_load_shader.vert", VS.as_bytes());
    let frag = temp("pastel_video_load_shader.frag", FS.as_bytes());

    let shader = load_shader(&mut video, &vert, &frag).unwrap();
    assert!(!shader.is_null());

    fs::remove_file(&vert).unwrap();
    fs::remove_file(&frag).unwrap();

    match load_shader(&mut video, &vert, &frag) {
        Err(Error::ResourceNotFound(path, _)) => assert_eq!(path, vert),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn demo_shader_slots() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("res")
        .join("shaders");

    let vert = fs::read_to_string(dir.join("lit.vert")).unwrap();
    let frag = fs::read_to_string(dir.join("lit.frag")).unwrap();

    verify_slots(
        &vert,
        &[
            (0, UniformVariableType::Matrix4f),
            (1, UniformVariableType::Matrix4f),
            (2, UniformVariableType::Matrix4f),
        ],
    )
    .unwrap();

    verify_slots(
        &frag,
        &[
            (3, UniformVariableType::Texture),
            (5, UniformVariableType::Vector3f),
            (6, UniformVariableType::Vector3f),
            (7, UniformVariableType::Vector3f),
        ],
    )
    .unwrap();

    assert!(verify_slots(&frag, &[(5, UniformVariableType::F32)]).is_err());
}

#[test]
fn demo_cube() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("res")
        .join("cube.obj");

    let mesh = parse_obj(&path).unwrap();
    assert_eq!(mesh.indices.len(), 36);
    assert!(mesh
        .vertices
        .iter()
        .all(|v| v.normal[0].abs() + v.normal[1].abs() + v.normal[2].abs() == 1.0));
}

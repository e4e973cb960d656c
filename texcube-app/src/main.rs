use texcube::{SceneSettings, WindowSettings};

const DEFAULT_TEXTURE: &str = "test1.png";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let texture_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TEXTURE.to_string());
    log::info!("texture: {texture_path}");

    texcube::run(
        WindowSettings::default(),
        SceneSettings::default(),
        texture_path,
    )
}

use std::fs;

use clap::{Arg, ArgAction, Command};
use log::{info, warn};
use minifb::{Window, WindowOptions};

use dmgcore::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};
use dmgcore::GameBoy;

/// DMG shades, lightest to darkest, rendered as 0xRRGGBB.
const SHADES: [u32; 4] = [0x9BBC0F, 0x8BAC0F, 0x306230, 0x0F380F];

fn main() {
    env_logger::init();
    info!("dmgcore-cli: explicitly out of the emulation core's test scope.");

    let matches = Command::new("dmgcore-cli")
        .version("0.1.0")
        .author("m0x")
        .about("Interactive front-end for the dmgcore Game Boy emulation core.")
        .arg(
            Arg::new("rom")
                .short('r')
                .long("rom")
                .value_name("FILE")
                .help("Sets the ROM file to load.")
                .required(true),
        )
        .arg(
            Arg::new("boot-rom")
                .long("boot-rom")
                .value_name("FILE")
                .help("Optional 256-byte boot ROM image to overlay at power-on."),
        )
        .arg(
            Arg::new("testing")
                .short('t')
                .long("testing")
                .help("Skip the boot ROM overlay even if one is provided.")
                .action(ArgAction::SetTrue),
        )
        .arg_required_else_help(true)
        .get_matches();

    let rom_path = matches.get_one::<String>("rom").unwrap();
    let testing = matches.get_flag("testing");

    let rom = fs::read(rom_path).unwrap_or_else(|e| panic!("failed to read ROM {rom_path}: {e}"));

    let boot_rom = if testing {
        None
    } else {
        matches.get_one::<String>("boot-rom").map(|path| {
            let bytes = fs::read(path).unwrap_or_else(|e| panic!("failed to read boot ROM {path}: {e}"));
            let mut image = [0u8; 256];
            image.copy_from_slice(&bytes[..256]);
            image
        })
    };

    let mut gb = GameBoy::new(rom, boot_rom).unwrap_or_else(|e| panic!("failed to load cartridge: {e}"));

    let mut window = Window::new(
        "dmgcore",
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        WindowOptions::default(),
    )
    .unwrap_or_else(|e| panic!("failed to open window: {e}"));

    let mut pixels = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];

    while window.is_open() {
        gb.run_frame();

        for (y, row) in gb.framebuffer().iter().enumerate() {
            for (x, &shade) in row.iter().enumerate() {
                pixels[y * SCREEN_WIDTH + x] = SHADES[shade as usize];
            }
        }

        if let Err(e) = window.update_with_buffer(&pixels, SCREEN_WIDTH, SCREEN_HEIGHT) {
            warn!("failed to present frame: {e}");
            break;
        }
    }
}

use std::thread::sleep;
use std::time::{Duration, SystemTime};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

#[macro_use]
extern crate clap;
use clap::{App, Arg};

use spacebox::config::Config;
use spacebox::gpu::{render_frame, write_png, SCREEN_HEIGHT, SCREEN_WIDTH};
use spacebox::invaders::Button;
use spacebox::machine::Machine;

const DEBUG_PERFORMANCE: bool = false;

fn button_for_keycode(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::C => Some(Button::Coin),
        Keycode::Return => Some(Button::P1Start),
        Keycode::S => Some(Button::P2Start),
        Keycode::Left => Some(Button::P1Left),
        Keycode::Right => Some(Button::P1Right),
        Keycode::Up => Some(Button::P1Fire),
        Keycode::A => Some(Button::P2Left),
        Keycode::D => Some(Button::P2Right),
        Keycode::W => Some(Button::P2Fire),
        _ => None,
    }
}

fn main() {
    let matches = App::new("spacebox-frontend")
        .version("0.1")
        .arg(Arg::with_name("INPUT")
            .help("Sets the rom image to use")
            .required(true)
            .index(1))
        .arg(Arg::with_name("SCALE")
            .help("Scale the window resolution")
            .takes_value(true)
            .long("scale"))
        .arg(Arg::with_name("CONFIG")
            .help("Cabinet configuration file (DIP switches)")
            .takes_value(true)
            .long("config"))
        .arg(Arg::with_name("TRACEFILE")
            .help("Output a instruction trace (debugging)")
            .takes_value(true)
            .long("trace"))
        .arg(Arg::with_name("TRACECOUNT")
            .help("Limits the trace to a number of instructions (debugging)")
            .takes_value(true)
            .long("tracecount"))
        .get_matches();

    let filename = matches.value_of("INPUT").unwrap();

    let mut machine = Machine::default();

    if matches.is_present("CONFIG") {
        let config_name = matches.value_of("CONFIG").unwrap();
        let config = match Config::load(config_name) {
            Ok(config) => config,
            Err(e) => panic!("error reading {}: {}", config_name, e),
        };
        machine.invaders_mut().set_dip(&config.dip);
    }

    if matches.is_present("TRACEFILE") {
        let tracename = matches.value_of("TRACEFILE").unwrap();
        println!("Instruction trace will be written to {}", tracename);
        machine.write_trace_to(tracename);
    }
    if matches.is_present("TRACECOUNT") {
        machine.set_trace_count(value_t!(matches, "TRACECOUNT", usize).unwrap());
    }

    if let Err(e) = machine.load_rom_file(filename, 0) {
        panic!("error {}", e);
    }

    let sdl_context = sdl2::init().unwrap();
    let video_subsys = sdl_context.video().unwrap();

    let scale_factor = value_t!(matches, "SCALE", f32).unwrap_or(2.);

    let screen_width = (SCREEN_WIDTH as f32 * scale_factor) as u32;
    let screen_height = (SCREEN_HEIGHT as f32 * scale_factor) as u32;
    let window = video_subsys.window(&format!("spacebox - {}", filename), screen_width, screen_height)
        .position_centered()
        .opengl()
        .allow_highdpi()
        .build()
        .unwrap();

    let mut canvas = window.into_canvas().present_vsync().build().unwrap();
    canvas.set_logical_size(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32).unwrap();
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGB24, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
        .unwrap();

    let mut events = sdl_context.event_pump().unwrap();

    // cycles per half frame, the display interrupts fire at mid
    // and end of every scan
    let half_frame_cycles = machine.cpu.clock_hz / 120;
    let frame_length = Duration::new(0, 1_000_000_000 / 60);

    let mut frame_exec_sum = Duration::new(0, 0);
    let mut frame_render_sum = Duration::new(0, 0);
    let mut frame_num = 0u64;

    'main: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit {..} => break 'main,

                Event::KeyDown {keycode: Some(keycode), repeat, ..} => {
                    if repeat {
                        continue;
                    }
                    if keycode == Keycode::Escape {
                        break 'main;
                    }
                    if keycode == Keycode::F12 {
                        let frame = render_frame(&machine.memory);
                        match write_png("screenshot.png", &frame) {
                            Ok(_) => println!("saved screenshot.png"),
                            Err(e) => println!("error saving screenshot: {}", e),
                        }
                        continue;
                    }
                    if let Some(button) = button_for_keycode(keycode) {
                        machine.invaders_mut().press(button);
                    }
                }
                Event::KeyUp {keycode: Some(keycode), ..} => {
                    if let Some(button) = button_for_keycode(keycode) {
                        machine.invaders_mut().release(button);
                    }
                }
                _ => {}
            }
        }

        let frame_start = SystemTime::now();

        // run the frame in two halves, the cabinet raises rst 1 at the
        // middle of the scan and rst 2 at the bottom
        machine.execute_cycles(half_frame_cycles);
        if machine.cpu.fatal_error {
            println!("cpu fatal error occured. stopping execution after {} instructions executed", machine.cpu.instruction_count);
            break 'main;
        }
        machine.raise_interrupt(1);

        machine.execute_cycles(half_frame_cycles);
        if machine.cpu.fatal_error {
            println!("cpu fatal error occured. stopping execution after {} instructions executed", machine.cpu.instruction_count);
            break 'main;
        }
        machine.raise_interrupt(2);

        let exec_time = frame_start.elapsed().unwrap();
        frame_exec_sum += exec_time;

        let render_start = SystemTime::now();

        let frame = render_frame(&machine.memory);
        texture.update(None, &frame.data, SCREEN_WIDTH * 3).unwrap();
        canvas.copy(&texture, None, None).unwrap();
        canvas.present();

        frame_render_sum += render_start.elapsed().unwrap();
        frame_num += 1;

        if DEBUG_PERFORMANCE && frame_num % 600 == 0 {
            println!("exec avg {:?}, render avg {:?} over {} frames",
                frame_exec_sum / frame_num as u32,
                frame_render_sum / frame_num as u32,
                frame_num);
        }

        // keep to 60 fps also when vsync is off
        let spent = frame_start.elapsed().unwrap();
        if spent < frame_length {
            sleep(frame_length - spent);
        }
    }
}

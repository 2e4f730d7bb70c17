#[macro_use]
extern crate clap;
use clap::{App, Arg};

use spacebox::cpu::Decoder;
use spacebox::memory::FlatMemory;
use spacebox::string::parse_number_string;
use spacebox::tools::read_binary;

fn main() {
    let matches = App::new("spacebox-disasm")
        .version("0.1")
        .arg(Arg::with_name("INPUT")
            .help("Sets the rom image to use")
            .required(true)
            .index(1))
        .arg(Arg::with_name("ORG")
            .help("Load address of the image, eg 0x0000")
            .takes_value(true)
            .long("org"))
        .arg(Arg::with_name("COUNT")
            .help("Number of instructions to disassemble (default: the whole image)")
            .takes_value(true)
            .long("count"))
        .get_matches();

    let filename = matches.value_of("INPUT").unwrap();
    let org = match parse_number_string(matches.value_of("ORG").unwrap_or("0")) {
        Ok(n) => n as u16,
        Err(e) => panic!("invalid --org: {}", e),
    };

    let data = match read_binary(filename) {
        Ok(data) => data,
        Err(e) => panic!("error reading {}: {}", filename, e),
    };

    let mut memory = FlatMemory::new();
    memory.write(org, &data);
    let mut decoder = Decoder::default();

    if matches.is_present("COUNT") {
        let count = value_t!(matches, "COUNT", usize).unwrap();
        println!("{}", decoder.disassemble_block_to_str(&memory, org, count));
        return;
    }

    let end = org as usize + data.len();
    let mut offset = org;
    while (offset as usize) < end {
        let op = decoder.get_instruction_info(&memory, offset);
        println!("{}", op);
        offset = offset.wrapping_add(op.instruction.length as u16);
    }
}

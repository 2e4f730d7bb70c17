use pretty_assertions::assert_eq;

use crate::string::{parse_number_string, right_pad};

#[test]
fn can_right_pad() {
    assert_eq!("ret   ", right_pad("ret", 6));
    assert_eq!("lhld", right_pad("lhld", 3));
}

#[test]
fn can_parse_number_string() {
    assert_eq!(0x2400, parse_number_string("0x2400").unwrap());
    assert_eq!(9216, parse_number_string("9216").unwrap());
    assert_eq!(0xF000, parse_number_string("0xF0_00").unwrap());
}

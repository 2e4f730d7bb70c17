use pretty_assertions::assert_eq;

use crate::cpu::flag::Flags;

#[test]
fn parity_counts_even_ones_including_zero() {
    let mut flags = Flags::default();
    flags.set_parity(0x00);
    assert_eq!(true, flags.parity);
    flags.set_parity(0x01);
    assert_eq!(false, flags.parity);
    flags.set_parity(0x03);
    assert_eq!(true, flags.parity);
    flags.set_parity(0xFF);
    assert_eq!(true, flags.parity);
    flags.set_parity(0xFE);
    assert_eq!(false, flags.parity);

    // table agrees with popcount over the whole domain
    for v in 0..=0xFFusize {
        flags.set_parity(v);
        assert_eq!((v.count_ones() & 1) == 0, flags.parity, "parity of {:02X}", v);
    }
}

#[test]
fn psw_pack_unpack_roundtrip() {
    let mut flags = Flags::default();
    flags.sign = true;
    flags.aux_carry = true;
    flags.carry = true;
    let packed = flags.u8();
    assert_eq!(0x89, packed);

    let mut restored = Flags::default();
    restored.set_u8(packed);
    assert_eq!(true, restored.sign);
    assert_eq!(false, restored.zero);
    assert_eq!(true, restored.aux_carry);
    assert_eq!(false, restored.parity);
    assert_eq!(true, restored.carry);
}

#[test]
fn psw_unassigned_bits_read_back_as_zero() {
    // only bits 0, 1, 3, 5 and 7 carry state
    for x in 0..=0xFFu16 {
        let x = x as u8;
        let mut flags = Flags::default();
        flags.set_u8(x);
        assert_eq!(x & 0xAB, flags.u8());
    }
}

#[test]
fn aux_carry_from_nibble_overflow() {
    let mut flags = Flags::default();

    // 0x0F + 0x01 carries out of bit 3
    let res = 0x0F + 0x01;
    flags.set_aux(res, 0x0F, 0x01);
    assert_eq!(true, flags.aux_carry);

    // 0x0E + 0x01 does not
    let res = 0x0E + 0x01;
    flags.set_aux(res, 0x0E, 0x01);
    assert_eq!(false, flags.aux_carry);
}

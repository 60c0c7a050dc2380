use block_encoder::encode_bc1;

#[test]
#[should_panic(expected = "before `init`")]
fn encoding_before_init_panics() {
    let mut block = [0u8; 8];
    encode_bc1(10, &mut block, &[0u8; 64], false, false);
}

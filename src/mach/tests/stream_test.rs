use super::*;

fn stream() -> StreamCache {
    let mut store = RamStore::new(0x0FFF);
    let bytes: Vec<u8> = (0..=255).collect();
    store.write_block(0x100, &bytes);
    StreamCache::new(Box::new(store))
}

#[test]
fn test_sequential_reads_cross_windows() {
    let mut s = stream();
    s.set_position(0x100);
    for n in 0..200 {
        assert_eq!(s.read_byte(), n as u8);
    }
    assert_eq!(s.position(), 0x100 + 200);
}

#[test]
fn test_peek_does_not_advance() {
    let mut s = stream();
    s.set_position(0x13F);
    assert_eq!(s.peek_byte(), 0x3F);
    assert_eq!(s.read_byte(), 0x3F);
    assert_eq!(s.read_word(), 0x4041);
    assert_eq!(s.read_long(), [0x42, 0x43, 0x44, 0x45]);
}

#[test]
fn test_write_inside_window_is_seen() {
    let mut s = stream();
    s.set_position(0x100);
    assert_eq!(s.read_byte(), 0);
    s.write(0x101, 0xAA);
    assert_eq!(s.read_byte(), 0xAA);
    s.write_word(0x102, 0xBBCC);
    assert_eq!(s.read_word(), 0xBBCC);
}

#[test]
fn test_reposition_and_skip() {
    let mut s = stream();
    s.set_position(0x110);
    s.skip(0x20);
    assert_eq!(s.read_byte(), 0x30);
    s.set_position(0x105);
    assert_eq!(s.read_byte(), 0x05);
    s.skip(100);
    assert_eq!(s.read_byte(), 0x6A);
}

#[test]
fn test_mem_move_overlaps() {
    let mut s = stream();
    s.mem_move(0x110, 0x100, 100);
    assert_eq!(s.read(0x110), 0);
    assert_eq!(s.read(0x110 + 99), 99);
    s.mem_move(0x100, 0x110, 100);
    assert_eq!(s.read(0x100), 0);
    assert_eq!(s.read(0x163), 99);
}

#[test]
fn test_clear_long_range() {
    let mut s = stream();
    s.clear(0x100, 300);
    let mut dest = [1u8; 300];
    s.read_block(0x100, &mut dest);
    assert!(dest.iter().all(|b| *b == 0));
    assert_eq!(s.read(0x100 + 300), 0);
    s.set_position(0x100);
    assert_eq!(s.read_byte(), 0);
}

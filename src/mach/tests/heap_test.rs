use super::*;

#[test]
fn test_free_at_floor_reclaims() {
    let mut mem = memory();
    let floor = mem.layout().string_bot;
    let a = mem.string_alloc(0).unwrap();
    assert_eq!(a, floor - 17 + 1);
    assert_eq!(mem.layout().string_bot, floor - 17);
    mem.string_free(a);
    assert_eq!(mem.layout().string_bot, floor);
    assert_eq!(mem.free_list_head(0), 0);
}

#[test]
fn test_freed_block_is_reused() {
    let mut mem = memory();
    let a = mem.string_alloc(1).unwrap();
    let b = mem.string_alloc(1).unwrap();
    assert!(b < a);
    let floor = mem.layout().string_bot;
    mem.string_free(a);
    assert_eq!(mem.free_list_head(1), a - 1);
    let c = mem.string_alloc(1).unwrap();
    assert_eq!(c, a);
    assert_eq!(mem.layout().string_bot, floor);
    assert_eq!(mem.free_list_head(1), 0);
}

#[test]
fn test_free_list_descends() {
    let mut mem = memory();
    let a = mem.string_alloc(0).unwrap();
    let b = mem.string_alloc(0).unwrap();
    let c = mem.string_alloc(0).unwrap();
    let _d = mem.string_alloc(0).unwrap();
    mem.string_free(c);
    mem.string_free(a);
    mem.string_free(b);
    assert_eq!(mem.string_alloc(0).unwrap(), a);
    assert_eq!(mem.string_alloc(0).unwrap(), b);
    assert_eq!(mem.string_alloc(0).unwrap(), c);
}

#[test]
fn test_realloc() {
    let mut mem = memory();
    let a = mem.string_alloc(0).unwrap();
    assert_eq!(mem.string_realloc(a, 10).unwrap(), a);
    let b = mem.string_realloc(a, 100).unwrap();
    assert_eq!(mem.stream.read(b - 1), 6);
    assert_eq!(mem.string_realloc(b, 0).unwrap(), 0);
    assert_eq!(mem.layout().string_bot, mem.layout().cmd_line);
}

#[test]
fn test_temp_strings_reset() {
    let mut mem = memory();
    let top = mem.layout().temp_top;
    let s = mem.temp_string(b"HELLO").unwrap();
    assert_eq!(s.addr, top);
    assert_eq!(mem.string_bytes(s), b"HELLO".to_vec());
    assert_eq!(mem.layout().temp_top, top + 5);
    mem.temp_reset();
    assert_eq!(mem.layout().temp_top, top);
    assert_eq!(mem.temp_string(b"").unwrap(), StrRef::NULL);
}

#[test]
fn test_store_string_copies_temp_into_heap() {
    let mut mem = memory();
    let slot = mem.var_for_assign(string_var("A")).unwrap();
    let s = mem.temp_string(b"HELLO").unwrap();
    mem.store_string(slot, s).unwrap();
    mem.temp_reset();
    mem.temp_string(b"XXXXX").unwrap();
    let stored = match mem.read_val(slot, VarType::String) {
        Val::String(stored) => stored,
        other => panic!("{:?}", other),
    };
    assert!(stored.addr > mem.layout().string_bot);
    assert_eq!(mem.string_bytes(stored), b"HELLO".to_vec());
    mem.store_string(slot, StrRef::NULL).unwrap();
    assert_eq!(mem.layout().string_bot, mem.layout().cmd_line);
}

#[test]
fn test_long_temp_string() {
    let mut mem = memory();
    let e = mem.temp_string(&[b'X'; 256]).unwrap_err();
    assert!(e.is(ErrorCode::StringTooLong));
}

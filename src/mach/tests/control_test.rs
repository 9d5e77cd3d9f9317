use super::*;

fn resume(addr: Address) -> Resume {
    Resume {
        addr,
        line: Some(10),
    }
}

fn for_loop(name: &str, to: f32) -> ForLoop {
    ForLoop {
        hash: float_var(name),
        to: Val::Float(to),
        step: Val::Float(1.0),
        body: resume(0x100),
    }
}

#[test]
fn test_gosub_returns_in_lifo_order() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    stack.push_gosub(&mut mem, resume(0x100)).unwrap();
    stack.push_gosub(&mut mem, resume(0x200)).unwrap();
    assert_eq!(stack.pop_gosub(&mut mem).unwrap(), resume(0x200));
    assert_eq!(stack.pop_gosub(&mut mem).unwrap(), resume(0x100));
    let e = stack.pop_gosub(&mut mem).unwrap_err();
    assert!(e.is(ErrorCode::ReturnWithoutGosub));
}

#[test]
fn test_frames_charge_the_control_region() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    let bottom = mem.layout().gosub_top;
    stack.push_gosub(&mut mem, resume(0x100)).unwrap();
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    assert_eq!(mem.layout().gosub_top, bottom + GOSUB_LEN + FOR_LEN);
    assert_eq!(mem.layout().temp_top, mem.layout().gosub_top);
    stack.pop_gosub(&mut mem).unwrap();
    assert_eq!(mem.layout().gosub_top, bottom);
    assert!(stack.is_empty());
}

#[test]
fn test_return_discards_open_loops() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    stack.push_gosub(&mut mem, resume(0x100)).unwrap();
    stack.push_for(&mut mem, for_loop("J", 3.0)).unwrap();
    stack.pop_gosub(&mut mem).unwrap();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.find_for(Some(float_var("I"))), Some(0));
}

#[test]
fn test_redeclared_loop_is_excised() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    stack.push_for(&mut mem, for_loop("J", 3.0)).unwrap();
    stack.push_for(&mut mem, for_loop("I", 5.0)).unwrap();
    assert_eq!(stack.frames(), &[Frame::For(for_loop("I", 5.0))]);
}

#[test]
fn test_find_for_stops_at_gosub() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    stack.push_gosub(&mut mem, resume(0x100)).unwrap();
    assert_eq!(stack.find_for(Some(float_var("I"))), None);
    assert_eq!(stack.find_for(None), None);
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    assert_eq!(stack.len(), 3);
    assert_eq!(stack.find_for(None), Some(2));
}

#[test]
fn test_advance_for_counts_to_limit() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    let i = float_var("I");
    let addr = mem.var_for_assign(i).unwrap();
    mem.write_val(addr, Val::Float(1.0)).unwrap();
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    let mut visits = vec![1.0];
    while let Some(body) = stack.advance_for(&mut mem, Some(i)).unwrap() {
        assert_eq!(body, resume(0x100));
        visits.push(match mem.read_val(addr, VarType::Float) {
            Val::Float(n) => n,
            other => panic!("{:?}", other),
        });
    }
    assert_eq!(visits, vec![1.0, 2.0, 3.0]);
    assert_eq!(mem.read_val(addr, VarType::Float), Val::Float(4.0));
    assert!(stack.is_empty());
}

#[test]
fn test_advance_for_counts_down() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    let i = VarHash::new(VarType::Integer, b"I");
    let addr = mem.var_for_assign(i).unwrap();
    mem.write_val(addr, Val::Integer(3)).unwrap();
    let frame = ForLoop {
        hash: i,
        to: Val::Integer(1),
        step: Val::Integer(-1),
        body: resume(0x100),
    };
    stack.push_for(&mut mem, frame).unwrap();
    assert!(stack.advance_for(&mut mem, None).unwrap().is_some());
    assert!(stack.advance_for(&mut mem, None).unwrap().is_some());
    assert!(stack.advance_for(&mut mem, None).unwrap().is_none());
    assert_eq!(mem.read_val(addr, VarType::Integer), Val::Integer(0));
}

#[test]
fn test_next_without_for() {
    let mut mem = memory();
    let mut stack = ControlStack::new();
    let e = stack.advance_for(&mut mem, None).unwrap_err();
    assert!(e.is(ErrorCode::NextWithoutFor));
    stack.push_for(&mut mem, for_loop("I", 3.0)).unwrap();
    let e = stack.advance_for(&mut mem, Some(float_var("J"))).unwrap_err();
    assert!(e.is(ErrorCode::NextWithoutFor));
}

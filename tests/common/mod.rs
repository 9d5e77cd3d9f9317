use basic::mach::{Config, Event, KeyQueue, MemoryFiles, Runtime, Screen, StdFormatter};

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped => {
                break;
            }
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("{}\n", error));
                }
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => {
                s.push_str(ps);
            }
            Event::Input(ps) => {
                s.push_str(ps);
                break;
            }
        }
        prev_running = event == Event::Running;
    }
    s
}

pub fn run(lines: &[&str]) -> String {
    let mut runtime = Runtime::default();
    for line in lines {
        assert!(runtime.enter(line), "did not enter {}", line);
    }
    exec(&mut runtime)
}

pub fn with_files(files: &MemoryFiles) -> Runtime {
    let config = Config::default();
    let display = Box::new(Screen::new(config.columns, config.rows));
    Runtime::with_devices(
        config,
        display,
        Box::new(KeyQueue::default()),
        Box::new(files.clone()),
        Box::new(StdFormatter),
    )
}

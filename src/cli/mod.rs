use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};

use crate::compile::{compile_file, trace, Compilation};
use crate::config::{BuildConfig, Config};
use crate::report::write_reports;

pub const SOURCE_FILE: &str = "main.banglish";
pub const GENERATED_DIR: &str = ".generated";
pub const CPP_FILE: &str = "transpiled.cpp";
pub const INPUT_FILE: &str = "input.txt";
pub const OUTPUT_FILE: &str = "output.txt";

enum Failure {
    /// Missing source, unreadable config or any other I/O step.
    Setup(anyhow::Error),
    Build(anyhow::Error),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Setup(_) => 1,
            Failure::Build(_) => 2,
        }
    }

    fn error(&self) -> &anyhow::Error {
        match self {
            Failure::Setup(err) | Failure::Build(err) => err,
        }
    }
}

pub fn run_cli() -> i32 {
    match std::env::current_dir() {
        Ok(dir) => run_cli_in(&dir),
        Err(err) => {
            eprintln!("error: cannot read working directory: {}", err);
            1
        }
    }
}

/// Runs the whole pipeline with `dir` as the working directory.
pub fn run_cli_in(dir: &Path) -> i32 {
    match run(dir) {
        Ok(()) => 0,
        Err(failure) => {
            eprintln!("error: {:#}", failure.error());
            failure.exit_code()
        }
    }
}

fn run(dir: &Path) -> Result<(), Failure> {
    let source_path = dir.join(SOURCE_FILE);
    if !source_path.is_file() {
        return Err(Failure::Setup(anyhow!(
            "{} not found in {}",
            SOURCE_FILE,
            dir.display()
        )));
    }
    let config = Config::load(dir).map_err(Failure::Setup)?;
    let unit = compile_file(&source_path).map_err(Failure::Setup)?;
    print_diagnostics(&unit);
    write_reports(dir, &unit).map_err(Failure::Setup)?;
    let cpp_path = write_generated(dir, &unit).map_err(Failure::Setup)?;

    let exe_path = dir.join(GENERATED_DIR).join(executable_name());
    build(&config.build, &cpp_path, &exe_path).map_err(Failure::Build)?;
    if config.run.enabled {
        run_program(dir, &exe_path).map_err(Failure::Setup)?;
    }
    Ok(())
}

fn print_diagnostics(unit: &Compilation) {
    if !unit.diagnostics.is_empty() {
        eprint!("{}", unit.render_diagnostics());
    }
    eprintln!(
        "{}: {} error(s), {} warning(s)",
        SOURCE_FILE,
        unit.diagnostics.error_count(),
        unit.diagnostics.warning_count()
    );
}

fn write_generated(dir: &Path, unit: &Compilation) -> Result<PathBuf> {
    let out_dir = dir.join(GENERATED_DIR);
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let path = out_dir.join(CPP_FILE);
    fs::write(&path, &unit.generated).with_context(|| format!("write {}", path.display()))?;
    trace(&format!("wrote {}", path.display()));
    Ok(path)
}

fn executable_name() -> &'static str {
    if cfg!(windows) {
        "program.exe"
    } else {
        "program"
    }
}

fn build(config: &BuildConfig, cpp_path: &Path, exe_path: &Path) -> Result<()> {
    let cxx = resolve_compiler(config);
    let args = compiler_args(config, cpp_path, exe_path);
    run_cmd(&cxx, &args)
}

fn compiler_args(config: &BuildConfig, cpp_path: &Path, exe_path: &Path) -> Vec<String> {
    let mut args = vec![
        format!("-std={}", config.std),
        format!("-O{}", config.opt_level),
    ];
    args.extend(config.extra_args.iter().cloned());
    args.push("-o".into());
    args.push(exe_path.display().to_string());
    args.push(cpp_path.display().to_string());
    args
}

fn resolve_compiler(config: &BuildConfig) -> String {
    if let Ok(cxx) = std::env::var("BANGLISH_CXX") {
        return cxx;
    }
    if let Some(cxx) = &config.compiler {
        return cxx.clone();
    }
    if command_exists("g++") {
        return "g++".to_string();
    }
    "clang++".to_string()
}

fn command_exists(cmd: &str) -> bool {
    Command::new(cmd).arg("--version").output().is_ok()
}

fn run_cmd(cmd: &str, args: &[String]) -> Result<()> {
    trace(&format!("running {} {}", cmd, args.join(" ")));
    let status = Command::new(cmd)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {}", cmd))?;
    if !status.success() {
        bail!("command failed: {} {}", cmd, args.join(" "));
    }
    Ok(())
}

fn run_program(dir: &Path, exe_path: &Path) -> Result<()> {
    let input_path = dir.join(INPUT_FILE);
    let stdin = if input_path.is_file() {
        let file =
            File::open(&input_path).with_context(|| format!("open {}", input_path.display()))?;
        Stdio::from(file)
    } else {
        Stdio::null()
    };
    let output_path = dir.join(OUTPUT_FILE);
    let stdout =
        File::create(&output_path).with_context(|| format!("create {}", output_path.display()))?;
    let exe = exe_path
        .canonicalize()
        .unwrap_or_else(|_| exe_path.to_path_buf());
    let status = Command::new(&exe)
        .current_dir(dir)
        .stdin(stdin)
        .stdout(stdout)
        .status()
        .with_context(|| format!("failed to run {}", exe.display()))?;
    if !status.success() {
        eprintln!("program exited with {}", status);
    }
    trace(&format!("program output in {}", output_path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{compiler_args, run_cli_in, CPP_FILE, GENERATED_DIR, SOURCE_FILE};
    use crate::config::{BuildConfig, CONFIG_FILE};
    use crate::report::{ERROR_LOG_FILE, SYMBOLS_FILE};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time drift")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "banglish-cli-{}-{}-{}",
            prefix,
            std::process::id(),
            nonce
        ));
        fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn missing_source_exits_with_one() {
        let root = temp_dir("no-source");
        assert_eq!(run_cli_in(&root), 1);
        assert!(!root.join(GENERATED_DIR).exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_config_exits_with_one() {
        let root = temp_dir("bad-config");
        fs::write(root.join(SOURCE_FILE), "shuru\nshesh\n").expect("write source");
        fs::write(root.join(CONFIG_FILE), "[build\n").expect("write config");
        assert_eq!(run_cli_in(&root), 1);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn reports_and_cpp_are_written_before_build_failure() {
        if std::env::var("BANGLISH_CXX").is_ok() {
            return;
        }
        let root = temp_dir("build-fail");
        fs::write(
            root.join(SOURCE_FILE),
            "shuru\nlekha name = \"hi\";\ndekhao name;\nshesh\n",
        )
        .expect("write source");
        fs::write(
            root.join(CONFIG_FILE),
            "[build]\ncompiler = \"banglish-missing-compiler\"\n",
        )
        .expect("write config");

        assert_eq!(run_cli_in(&root), 2);
        let cpp = fs::read_to_string(root.join(GENERATED_DIR).join(CPP_FILE)).expect("cpp");
        assert!(cpp.contains("std::string name = \"hi\";"));
        let table = fs::read_to_string(root.join(SYMBOLS_FILE)).expect("symbols");
        assert!(table.contains("| name       | string       | 2      | yes    |"));
        let log = fs::read_to_string(root.join(ERROR_LOG_FILE)).expect("log");
        assert!(log.contains("No errors or warnings found."));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn compiler_args_follow_config() {
        let cfg = BuildConfig {
            extra_args: vec!["-Wall".to_string()],
            ..BuildConfig::default()
        };
        let args = compiler_args(&cfg, Path::new("a.cpp"), Path::new("prog"));
        assert_eq!(args, vec!["-std=c++17", "-O2", "-Wall", "-o", "prog", "a.cpp"]);
    }
}

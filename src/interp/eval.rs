//! Expression and statement evaluator

use super::error::{InterpResult, RuntimeError};
use super::frame::{Frame, FrameRef};
use super::value::{Closure, Function, NativeFn, Record, Value};
use crate::ast::{BinOp, Block, Expr, Stmt, UnOp};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// The tree-walking interpreter
pub struct Interpreter {
    global_frame: FrameRef,
    out: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

fn native(f: NativeFn) -> Value {
    Value::Function(Rc::new(Function::Native(f)))
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_io(
            Box::new(io::stdout()),
            Box::new(io::BufReader::new(io::stdin())),
        )
    }

    /// Build an interpreter over explicit streams. `print` writes to `out`
    /// and flushes per line; `input` reads lines from `input`.
    pub fn with_io(out: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        let builtins: HashSet<String> = ["print", "input", "intcast", "None"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let global_frame = Frame::root(builtins);
        {
            let mut frame = global_frame.borrow_mut();
            frame.define("print".into(), native(NativeFn::Print));
            frame.define("input".into(), native(NativeFn::Input));
            frame.define("intcast".into(), native(NativeFn::Intcast));
            frame.define("None".into(), Value::None);
        }
        Interpreter {
            global_frame,
            out,
            input,
        }
    }

    /// Evaluate the program's top-level block. A return unwinding past the
    /// outermost block ends the program normally.
    pub fn run(&mut self, program: &Block) -> InterpResult<()> {
        let global = Rc::clone(&self.global_frame);
        match self.exec_block(program, &global) {
            Err(RuntimeError::Return(_)) => Ok(()),
            other => other,
        }
    }

    fn exec_block(&mut self, block: &Block, frame: &FrameRef) -> InterpResult<()> {
        for stmt in &block.stmts {
            self.exec_stmt(stmt, frame)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt, frame: &FrameRef) -> InterpResult<()> {
        match stmt {
            Stmt::Assign { target, value } => self.assign(target, value, frame),
            Stmt::Call(expr) => {
                self.eval(expr, frame)?;
                Ok(())
            }
            // Already accounted for by the callee's global set
            Stmt::Global(_) => Ok(()),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => match self.eval(cond, frame)? {
                Value::Bool(true) => self.exec_block(then_block, frame),
                Value::Bool(false) => match else_block {
                    Some(block) => self.exec_block(block, frame),
                    None => Ok(()),
                },
                _ => Err(RuntimeError::IllegalCast),
            },
            Stmt::While { cond, body } => loop {
                match self.eval(cond, frame)? {
                    Value::Bool(true) => self.exec_block(body, frame)?,
                    Value::Bool(false) => return Ok(()),
                    _ => return Err(RuntimeError::IllegalCast),
                }
            },
            Stmt::Return(expr) => {
                let value = self.eval(expr, frame)?;
                Err(RuntimeError::ret(value))
            }
        }
    }

    fn assign(&mut self, target: &Expr, value: &Expr, frame: &FrameRef) -> InterpResult<()> {
        match target {
            Expr::Ident(name) => {
                let v = self.eval(value, frame)?;
                let dest = Frame::lookup_write(name, frame);
                dest.borrow_mut().define(name.clone(), v);
                Ok(())
            }
            Expr::Field { base, name } => {
                let base_v = self.eval(base, frame)?;
                let v = self.eval(value, frame)?;
                match base_v {
                    Value::Record(record) => {
                        record.borrow_mut().store(name, v);
                        Ok(())
                    }
                    _ => Err(RuntimeError::IllegalCast),
                }
            }
            Expr::Index { base, key } => {
                let base_v = self.eval(base, frame)?;
                let key_v = self.eval(key, frame)?;
                let name = key_v.to_string();
                let v = self.eval(value, frame)?;
                match base_v {
                    Value::Record(record) => {
                        record.borrow_mut().store(&name, v);
                        Ok(())
                    }
                    _ => Err(RuntimeError::IllegalCast),
                }
            }
            _ => Err(RuntimeError::Runtime),
        }
    }

    fn eval(&mut self, expr: &Expr, frame: &FrameRef) -> InterpResult<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Str(s) => Ok(Value::Str(Rc::new(s.clone()))),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::None => Ok(Value::None),
            Expr::Ident(name) => Frame::lookup_read(name, frame),
            Expr::Unary { op, operand } => {
                let v = self.eval(operand, frame)?;
                eval_unary(*op, v)
            }
            Expr::Binary { left, op, right } => {
                let l = self.eval(left, frame)?;
                let r = self.eval(right, frame)?;
                eval_binary(*op, l, r)
            }
            Expr::Field { base, name } => match self.eval(base, frame)? {
                Value::Record(record) => Ok(record.borrow().load(name)),
                _ => Err(RuntimeError::IllegalCast),
            },
            Expr::Index { base, key } => match self.eval(base, frame)? {
                // The base's tag is checked before the key is evaluated
                Value::Record(record) => {
                    let key_v = self.eval(key, frame)?;
                    let name = key_v.to_string();
                    Ok(record.borrow().load(&name))
                }
                _ => Err(RuntimeError::IllegalCast),
            },
            Expr::Record { fields } => {
                let record = Rc::new(RefCell::new(Record::default()));
                for (name, field_expr) in fields {
                    let v = self.eval(field_expr, frame)?;
                    // Update-or-append, so a duplicated name keeps the
                    // later value
                    record.borrow_mut().store(name, v);
                }
                Ok(Value::Record(record))
            }
            Expr::Fun(decl) => Ok(Value::Function(Rc::new(Function::Closure(Closure {
                context: Rc::clone(frame),
                decl: Rc::clone(decl),
            })))),
            Expr::Call { target, args } => self.eval_call(target, args, frame),
        }
    }

    fn eval_call(&mut self, target: &Expr, args: &[Expr], frame: &FrameRef) -> InterpResult<Value> {
        let target_v = self.eval(target, frame)?;
        let func = match target_v {
            Value::Function(func) => func,
            _ => return Err(RuntimeError::IllegalCast),
        };
        if func.arity() != args.len() {
            return Err(RuntimeError::Runtime);
        }
        match &*func {
            Function::Native(native) => self.call_native(*native, args, frame),
            Function::Closure(closure) => {
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval(arg, frame)?);
                }
                self.call_closure(closure, arg_values)
            }
        }
    }

    fn call_native(
        &mut self,
        native: NativeFn,
        args: &[Expr],
        frame: &FrameRef,
    ) -> InterpResult<Value> {
        match native {
            NativeFn::Print => {
                let v = self.eval(&args[0], frame)?;
                writeln!(self.out, "{v}").map_err(|_| RuntimeError::Runtime)?;
                self.out.flush().map_err(|_| RuntimeError::Runtime)?;
                Ok(Value::None)
            }
            NativeFn::Input => {
                let mut line = String::new();
                self.input
                    .read_line(&mut line)
                    .map_err(|_| RuntimeError::Runtime)?;
                if line.ends_with('\n') {
                    line.pop();
                }
                Ok(Value::Str(Rc::new(line)))
            }
            NativeFn::Intcast => {
                let v = self.eval(&args[0], frame)?;
                match v {
                    Value::Int(n) => Ok(Value::Int(n)),
                    Value::Str(s) => parse_int(&s).map(Value::Int).ok_or(RuntimeError::IllegalCast),
                    _ => Err(RuntimeError::IllegalCast),
                }
            }
        }
    }

    /// Call protocol: fresh frame under the captured context, the callee's
    /// global set installed, assigned-but-not-parameter names pre-bound to
    /// None, parameters bound last
    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> InterpResult<Value> {
        let decl = &closure.decl;
        let globals = global_names(&decl.body);
        let frame = Frame::with_parent(Rc::clone(&closure.context), globals);
        {
            let mut f = frame.borrow_mut();
            for name in assigned_names(&decl.body) {
                if !decl.params.contains(&name) && !f.is_global(&name) {
                    f.define(name, Value::None);
                }
            }
            for (param, value) in decl.params.iter().zip(args) {
                f.define(param.clone(), value);
            }
        }
        match self.exec_block(&decl.body, &frame) {
            Ok(()) => Ok(Value::None),
            Err(RuntimeError::Return(value)) => Ok(*value),
            Err(err) => Err(err),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn eval_unary(op: UnOp, v: Value) -> InterpResult<Value> {
    match (op, v) {
        (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(RuntimeError::IllegalCast),
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> InterpResult<Value> {
    match op {
        BinOp::Add => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
            (Value::Str(a), b) => Ok(Value::Str(Rc::new(format!("{a}{b}")))),
            (a, Value::Str(b)) => Ok(Value::Str(Rc::new(format!("{a}{b}")))),
            _ => Err(RuntimeError::IllegalCast),
        },
        BinOp::Sub => int_op(left, right, |a, b| a.wrapping_sub(b)),
        BinOp::Mul => int_op(left, right, |a, b| a.wrapping_mul(b)),
        BinOp::Div => match (left, right) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::IllegalArithmetic),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_div(b))),
            _ => Err(RuntimeError::IllegalCast),
        },
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Lt => cmp_op(left, right, |a, b| a < b),
        BinOp::Gt => cmp_op(left, right, |a, b| a > b),
        BinOp::Leq => cmp_op(left, right, |a, b| a <= b),
        BinOp::Geq => cmp_op(left, right, |a, b| a >= b),
        // Both operands are evaluated before we get here; no short-circuit
        BinOp::And => bool_op(left, right, |a, b| a && b),
        BinOp::Or => bool_op(left, right, |a, b| a || b),
    }
}

fn int_op(left: Value, right: Value, f: impl FnOnce(i32, i32) -> i32) -> InterpResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(f(a, b))),
        _ => Err(RuntimeError::IllegalCast),
    }
}

fn cmp_op(left: Value, right: Value, f: impl FnOnce(i32, i32) -> bool) -> InterpResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::IllegalCast),
    }
}

fn bool_op(left: Value, right: Value, f: impl FnOnce(bool, bool) -> bool) -> InterpResult<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::IllegalCast),
    }
}

/// `intcast` string form: optional leading `-`, then one or more digits,
/// matching the whole string; digits accumulate with wrapping arithmetic
fn parse_int(s: &str) -> Option<i32> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut n: i32 = 0;
    for b in digits.bytes() {
        n = n.wrapping_mul(10).wrapping_add((b - b'0') as i32);
    }
    Some(if negative { n.wrapping_neg() } else { n })
}

/// Names assigned as plain identifiers anywhere in the body, not crossing
/// nested function declarations
fn assigned_names(block: &Block) -> HashSet<String> {
    let mut names = HashSet::new();
    collect_assigned(block, &mut names);
    names
}

fn collect_assigned(block: &Block, names: &mut HashSet<String>) {
    for stmt in &block.stmts {
        match stmt {
            Stmt::Assign {
                target: Expr::Ident(name),
                ..
            } => {
                names.insert(name.clone());
            }
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                collect_assigned(then_block, names);
                if let Some(block) = else_block {
                    collect_assigned(block, names);
                }
            }
            Stmt::While { body, .. } => collect_assigned(body, names),
            _ => {}
        }
    }
}

/// Names declared `global` anywhere in the body, under the same rule
fn global_names(block: &Block) -> HashSet<String> {
    let mut names = HashSet::new();
    collect_globals(block, &mut names);
    names
}

fn collect_globals(block: &Block, names: &mut HashSet<String>) {
    for stmt in &block.stmts {
        match stmt {
            Stmt::Global(name) => {
                names.insert(name.clone());
            }
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                collect_globals(then_block, names);
                if let Some(block) = else_block {
                    collect_globals(block, names);
                }
            }
            Stmt::While { body, .. } => collect_globals(body, names),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    /// Write half of a shared byte buffer, so tests can observe `print`
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_with_stdin(source: &str, stdin: &str) -> (InterpResult<()>, String) {
        let program = parse(&tokenize(source)).expect("test program should parse");
        let buf = SharedBuf::default();
        let mut interp = Interpreter::with_io(
            Box::new(buf.clone()),
            Box::new(io::Cursor::new(stdin.as_bytes().to_vec())),
        );
        let result = interp.run(&program);
        let output = String::from_utf8(buf.0.borrow().clone()).expect("output should be utf-8");
        (result, output)
    }

    fn run(source: &str) -> (InterpResult<()>, String) {
        run_with_stdin(source, "")
    }

    fn output_of(source: &str) -> String {
        let (result, output) = run(source);
        assert_eq!(result, Ok(()), "program should not fault");
        output
    }

    fn fault_of(source: &str) -> RuntimeError {
        let (result, _) = run(source);
        result.expect_err("program should fault")
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(output_of("print(1+2*3);"), "7\n");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            output_of(r#"x = "hello"; y = " world"; print(x+y);"#),
            "hello world\n"
        );
    }

    #[test]
    fn test_string_plus_any_stringifies() {
        assert_eq!(output_of(r#"print("n=" + 3);"#), "n=3\n");
        assert_eq!(output_of(r#"print(3 + "=n");"#), "3=n\n");
        assert_eq!(output_of(r#"print("v=" + true);"#), "v=true\n");
        assert_eq!(output_of(r#"print("v=" + None);"#), "v=None\n");
    }

    #[test]
    fn test_int_plus_bool_is_illegal() {
        assert_eq!(fault_of("print(1 + true);"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(output_of("print(7/2);"), "3\n");
        assert_eq!(output_of("print(-7/2);"), "-3\n");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(fault_of("print(1/0);"), RuntimeError::IllegalArithmetic);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(output_of("print(1 < 2); print(2 <= 2); print(3 > 4); print(4 >= 5);"),
            "true\ntrue\nfalse\nfalse\n");
    }

    #[test]
    fn test_comparison_on_strings_is_illegal() {
        assert_eq!(fault_of(r#"print("a" < "b");"#), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_equality_mixed_tags_is_false() {
        assert_eq!(output_of("print(1 == true);"), "false\n");
        assert_eq!(output_of(r#"print("1" == 1);"#), "false\n");
        assert_eq!(output_of("print(None == None);"), "true\n");
    }

    #[test]
    fn test_not_involution() {
        assert_eq!(output_of("print(!(!true) == true);"), "true\n");
        assert_eq!(output_of("print(!(!false) == false);"), "true\n");
    }

    #[test]
    fn test_boolean_ops_are_eager() {
        // No short-circuit: the right operand is always evaluated
        assert_eq!(
            fault_of("x = true | (1/0 == 1);"),
            RuntimeError::IllegalArithmetic
        );
        assert_eq!(
            fault_of("x = false & (1/0 == 1);"),
            RuntimeError::IllegalArithmetic
        );
    }

    #[test]
    fn test_neg_on_bool_is_illegal() {
        assert_eq!(fault_of("x = -true;"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_if_branches() {
        assert_eq!(output_of("if (1 < 2) { print(1); } else { print(2); }"), "1\n");
        assert_eq!(output_of("if (1 > 2) { print(1); } else { print(2); }"), "2\n");
        assert_eq!(output_of("if (1 > 2) { print(1); }"), "");
    }

    #[test]
    fn test_if_condition_must_be_bool() {
        assert_eq!(fault_of("if (1) { print(1); }"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(
            output_of("i = 0; while (i < 3) { print(i); i = i + 1; }"),
            "0\n1\n2\n"
        );
    }

    #[test]
    fn test_while_condition_checked_each_iteration() {
        // The condition turns non-bool on the second check
        let source = "b = true; x = 0; while (b) { x = x + 1; b = 1; }";
        assert_eq!(fault_of(source), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_closure_captures_frame() {
        let source = "make = fun(x) { return fun() { return x; }; }; f = make(5); print(f());";
        assert_eq!(output_of(source), "5\n");
    }

    #[test]
    fn test_closure_sees_later_assignment_through_frame() {
        let source =
            "f = fun() { n = 1; g = fun() { return n; }; n = 2; return g; }; h = f(); print(h());";
        assert_eq!(output_of(source), "2\n");
    }

    #[test]
    fn test_inner_assignment_makes_a_fresh_local() {
        // The inner function assigns n, so n is pre-bound to None in the
        // inner frame and the increment faults
        let source = "counter = fun() { n = 0; return fun() { n = n + 1; return n; }; }; \
                      c = counter(); c();";
        assert_eq!(fault_of(source), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_counter_through_record_state() {
        let source = "counter = fun() { r = { n:0; }; return fun() { r.n = r.n + 1; return r.n; }; }; \
                      c = counter(); print(c()); print(c()); print(c());";
        assert_eq!(output_of(source), "1\n2\n3\n");
    }

    #[test]
    fn test_global_declaration_routes_writes() {
        let source = "x = 1; f = fun() { global x; x = x + 1; }; f(); f(); print(x);";
        assert_eq!(output_of(source), "3\n");
    }

    #[test]
    fn test_unassigned_global_read_faults() {
        let source = "f = fun() { global zz; return zz; }; f();";
        assert_eq!(fault_of(source), RuntimeError::UninitializedVariable);
    }

    #[test]
    fn test_uninitialized_variable() {
        assert_eq!(fault_of("print(nope);"), RuntimeError::UninitializedVariable);
    }

    #[test]
    fn test_local_assigned_later_reads_none() {
        // x is in the body's assigns set, so an early read yields None
        let source = r#"f = fun() { y = "" + x; x = 1; return y; }; print(f());"#;
        assert_eq!(output_of(source), "None\n");
    }

    #[test]
    fn test_record_literal_field_and_index() {
        let source = r#"r = { a:1; b:2; }; r.c = r.a + r["b"]; print(r);"#;
        assert_eq!(output_of(source), "{ a:1 b:2 c:3 }\n");
    }

    #[test]
    fn test_record_duplicate_literal_key_last_wins() {
        assert_eq!(output_of("r = { a:1; a:2; }; print(r.a); print(r);"), "2\n{ a:2 }\n");
    }

    #[test]
    fn test_missing_field_reads_none() {
        assert_eq!(output_of("r = {}; print(r.missing);"), "None\n");
    }

    #[test]
    fn test_index_key_is_stringified() {
        assert_eq!(output_of(r#"r = {}; r[1] = 10; print(r["1"]);"#), "10\n");
        assert_eq!(
            output_of(r#"r = {}; r[true] = 1; print(r["true"]);"#),
            "1\n"
        );
    }

    #[test]
    fn test_field_access_on_non_record_faults() {
        assert_eq!(fault_of("x = 1; y = x.f;"), RuntimeError::IllegalCast);
        assert_eq!(fault_of("x = 1; x.f = 2;"), RuntimeError::IllegalCast);
        assert_eq!(fault_of("x = 1; y = x[0];"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_record_aliasing() {
        let source = "a = { n:1; }; b = a; b.n = 2; print(a.n);";
        assert_eq!(output_of(source), "2\n");
    }

    #[test]
    fn test_record_equality_is_identity() {
        assert_eq!(output_of("a = {}; b = {}; print(a == b); print(a == a);"), "false\ntrue\n");
    }

    #[test]
    fn test_function_equality_same_declaration_same_frame() {
        let source = "f = fun() { return 1; }; g = f; print(f == g);";
        assert_eq!(output_of(source), "true\n");
    }

    #[test]
    fn test_function_equality_distinct_declarations() {
        // Same source text, distinct declaration sites
        let source = "f = fun() { return 1; }; g = fun() { return 1; }; print(f == g);";
        assert_eq!(output_of(source), "false\n");
    }

    #[test]
    fn test_function_equality_distinct_frames() {
        // The same declaration closed over two different call frames
        let source =
            "make = fun() { return fun() { return 0; }; }; print(make() == make());";
        assert_eq!(output_of(source), "false\n");
    }

    #[test]
    fn test_call_non_function_faults() {
        assert_eq!(fault_of("x = 1; x();"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_arity_mismatch_faults() {
        assert_eq!(
            fault_of("f = fun(a) { return a; }; f(1, 2);"),
            RuntimeError::Runtime
        );
        assert_eq!(fault_of("print();"), RuntimeError::Runtime);
    }

    #[test]
    fn test_fall_off_end_returns_none() {
        assert_eq!(output_of("f = fun() { x = 1; }; print(f());"), "None\n");
    }

    #[test]
    fn test_return_unwinds_loop() {
        let source = "f = fun() { i = 0; while (true) { i = i + 1; if (i == 3) { return i; } } }; print(f());";
        assert_eq!(output_of(source), "3\n");
    }

    #[test]
    fn test_top_level_return_stops_program() {
        let (result, output) = run("print(1); return 0; print(2);");
        assert_eq!(result, Ok(()));
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_recursion() {
        let source = "fact = fun(n) { if (n < 2) { return 1; } return n * fact(n - 1); }; print(fact(5));";
        assert_eq!(output_of(source), "120\n");
    }

    #[test]
    fn test_intcast() {
        assert_eq!(output_of(r#"print(intcast("42"));"#), "42\n");
        assert_eq!(output_of(r#"print(intcast("-7"));"#), "-7\n");
        assert_eq!(output_of("print(intcast(9));"), "9\n");
        assert_eq!(fault_of(r#"print(intcast("4x"));"#), RuntimeError::IllegalCast);
        assert_eq!(fault_of(r#"print(intcast("-"));"#), RuntimeError::IllegalCast);
        assert_eq!(fault_of(r#"print(intcast(""));"#), RuntimeError::IllegalCast);
        assert_eq!(fault_of("print(intcast(true));"), RuntimeError::IllegalCast);
    }

    #[test]
    fn test_input_returns_line_as_string() {
        let (result, output) = run_with_stdin("x = input(); print(x + \"!\");", "hello\n");
        assert_eq!(result, Ok(()));
        assert_eq!(output, "hello!\n");
    }

    #[test]
    fn test_input_at_eof_is_empty_string() {
        let (result, output) = run_with_stdin(r#"print(input() == "");"#, "");
        assert_eq!(result, Ok(()));
        assert_eq!(output, "true\n");
    }

    #[test]
    fn test_print_returns_none() {
        assert_eq!(output_of("x = print(1); print(x);"), "1\nNone\n");
    }

    #[test]
    fn test_none_keyword_and_global_binding_agree() {
        assert_eq!(output_of("f = fun() { x = 1; }; print(f() == None);"), "true\n");
    }

    #[test]
    fn test_string_escapes_print_verbatim() {
        // Token text keeps the escapes; print propagates them unexpanded
        assert_eq!(output_of(r#"print("a\nb");"#), "a\\nb\n");
    }

    #[test]
    fn test_evaluation_order_left_to_right() {
        let source = "f = fun(tag) { print(tag); return 1; }; x = f(1) + f(2) * f(3);";
        assert_eq!(output_of(source), "1\n2\n3\n");
    }

    #[test]
    fn test_assigned_names_do_not_cross_fun() {
        let source = "f = fun() { g = fun() { z = 1; return z; }; return z; }; f();";
        // z is assigned only inside g, so f's read of z faults
        assert_eq!(fault_of(source), RuntimeError::UninitializedVariable);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(output_of("print(2147483647 + 1);"), "-2147483648\n");
        assert_eq!(output_of("print(-2147483647 - 2);"), "2147483647\n");
    }
}

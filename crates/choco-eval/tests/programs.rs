use choco_ast::build::*;
use choco_ast::{AssignTarget, BinOp, Class, DestructureTarget, Program, Stmt};
use choco_eval::{run, EvalError, Interpreter, Value};
use choco_types::Type;
use pretty_assertions::assert_eq;

/// ```text
/// class Point(object):
///     x: int = 0
///     y: int = 0
///     def __init__(self: Point) -> None:
///         self.y = 5
///     def sum(self: Point) -> int:
///         return self.x + self.y
/// ```
fn point() -> Class {
    let this = || param("self", Type::class("Point"));
    Class {
        name: "Point".into(),
        fields: vec![int_var("x", 0), int_var("y", 0)],
        methods: vec![
            fun(
                "__init__",
                vec![this()],
                Type::None,
                vec![],
                vec![field_assign(id("self"), "y", int(5))],
            ),
            fun(
                "sum",
                vec![this()],
                Type::Int,
                vec![],
                vec![ret(binop(
                    BinOp::Plus,
                    lookup(id("self"), "x"),
                    lookup(id("self"), "y"),
                ))],
            ),
        ],
    }
}

#[test]
fn test_objects_and_methods() {
    let program = Program {
        classes: vec![point()],
        inits: vec![var("p", Type::class("Point"))],
        stmts: vec![
            print(id("p")),
            assign("p", call(id("Point"), vec![])),
            field_assign(id("p"), "x", int(2)),
            print(method_call(id("p"), "sum", vec![])),
            print(id("p")),
        ],
        ..Program::default()
    };
    assert_eq!(run(&program).unwrap(), "None\n7\n<Point object>\n");
}

#[test]
fn test_missing_field_is_an_error() {
    let program = Program {
        classes: vec![point()],
        stmts: vec![expr_stmt(lookup(call(id("Point"), vec![]), "z"))],
        ..Program::default()
    };
    assert_eq!(
        run(&program).unwrap_err(),
        EvalError::NoSuchField {
            class: "Point".into(),
            field: "z".into(),
        }
    );
}

#[test]
fn test_starred_destructuring() {
    let target = |name: &str, starred: bool| DestructureTarget {
        target: AssignTarget::Id { name: name.into() },
        starred,
    };
    let program = Program {
        stmts: vec![
            Stmt::AssignDestructure {
                targets: vec![target("first", false), target("rest", true), target("last", false)],
                value: list(vec![int(1), int(2), int(3), int(4)]),
            },
            print(id("first")),
            print(id("rest")),
            print(id("last")),
        ],
        ..Program::default()
    };
    assert_eq!(run(&program).unwrap(), "1\n[2, 3]\n4\n");
}

#[test]
fn test_while_break_and_for_else() {
    let program = Program {
        inits: vec![int_var("i", 0)],
        stmts: vec![
            while_stmt(
                bool_lit(true),
                vec![
                    assign("i", binop(BinOp::Plus, id("i"), int(1))),
                    if_stmt(binop(BinOp::Gte, id("i"), int(3)), vec![Stmt::Break], vec![]),
                ],
            ),
            print(id("i")),
            Stmt::For {
                var: "c".into(),
                iterable: str_lit("ab"),
                body: vec![print(id("c"))],
                els: Some(vec![print(str_lit("done"))]),
            },
        ],
        ..Program::default()
    };
    assert_eq!(run(&program).unwrap(), "3\na\nb\ndone\n");
}

#[test]
fn test_global_declaration_in_function() {
    let bump = fun(
        "bump",
        vec![],
        Type::None,
        vec![],
        vec![
            Stmt::Global { name: "count".into() },
            assign("count", binop(BinOp::Plus, id("count"), int(1))),
        ],
    );
    let program = Program {
        funs: vec![bump],
        inits: vec![int_var("count", 10)],
        stmts: vec![
            expr_stmt(call(id("bump"), vec![])),
            expr_stmt(call(id("bump"), vec![])),
            print(id("count")),
        ],
        ..Program::default()
    };
    assert_eq!(run(&program).unwrap(), "12\n");
}

#[test]
fn test_call_entry_point() {
    let double = fun(
        "double",
        vec![param("x", Type::Int)],
        Type::Int,
        vec![],
        vec![ret(binop(BinOp::Mul, id("x"), int(2)))],
    );
    let program = Program {
        funs: vec![double],
        ..Program::default()
    };
    let mut interp = Interpreter::new(&program);
    let result = interp.call("double", vec![Value::Int(21)]).unwrap();
    assert!(result.equals(&Value::Int(42)));
    assert!(matches!(
        interp.call_value(Value::Int(1), vec![]),
        Err(EvalError::NotCallable(_))
    ));
}

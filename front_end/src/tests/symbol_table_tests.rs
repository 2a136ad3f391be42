use std::rc::Rc;

use crate::source_location::Span;
use crate::symbol::{FunctionSignature, Symbol};
use crate::symbol_table::{StructInfo, StructRegistry, SymbolTable, SymbolTableError};
use crate::types::TypeDescriptor;

fn int_symbol(name: &str) -> Rc<Symbol> {
    Rc::new(Symbol::variable(name, TypeDescriptor::Int, Span::point(1, 1)))
}

fn bool_symbol(name: &str) -> Rc<Symbol> {
    Rc::new(Symbol::variable(name, TypeDescriptor::Bool, Span::point(1, 1)))
}

fn emptied_table() -> SymbolTable {
    let mut table = SymbolTable::new();
    table.pop_scope().expect("new table has one frame");
    table
}

#[test]
fn test_new_table_has_one_frame() {
    let table = SymbolTable::new();
    assert_eq!(table.depth(), 1);
    assert!(!table.is_empty());
}

#[test]
fn test_declare_then_lookup_innermost() {
    let mut table = SymbolTable::new();
    let x = int_symbol("x");

    table.declare("x", Rc::clone(&x)).unwrap();

    let found = table.lookup_innermost("x").unwrap().expect("x is declared");
    assert!(Rc::ptr_eq(&found, &x));
    assert_eq!(table.lookup_innermost("y").unwrap(), None);
}

#[test]
fn test_duplicate_declaration_in_same_frame() {
    let mut table = SymbolTable::new();
    table.declare("x", int_symbol("x")).unwrap();

    let err = table.declare("x", bool_symbol("x")).unwrap_err();
    assert_eq!(err, SymbolTableError::DuplicateName("x".to_string()));

    // The first binding is untouched
    let found = table.lookup_innermost("x").unwrap().unwrap();
    assert_eq!(found.typ, TypeDescriptor::Int);
}

#[test]
fn test_balanced_push_pop_restores_depth() {
    let mut table = SymbolTable::new();
    let start = table.depth();

    for _ in 0..5 {
        table.push_scope();
    }
    table.declare("inner", int_symbol("inner")).unwrap();
    for _ in 0..5 {
        table.pop_scope().unwrap();
    }

    assert_eq!(table.depth(), start);
    assert_eq!(table.lookup_innermost("inner").unwrap(), None);
    assert_eq!(table.lookup_any("inner"), None);
}

#[test]
fn test_shadowing() {
    let mut table = SymbolTable::new();
    let outer = int_symbol("x");
    let inner = bool_symbol("x");

    table.declare("x", Rc::clone(&outer)).unwrap();
    table.push_scope();
    table.declare("x", Rc::clone(&inner)).expect("shadowing across frames is legal");

    assert!(Rc::ptr_eq(&table.lookup_any("x").unwrap(), &inner));

    table.pop_scope().unwrap();
    assert!(Rc::ptr_eq(&table.lookup_any("x").unwrap(), &outer));
}

#[test]
fn test_lookup_any_searches_outer_frames() {
    let mut table = SymbolTable::new();
    table.declare("g", int_symbol("g")).unwrap();
    table.push_scope();
    table.push_scope();

    assert!(table.lookup_any("g").is_some());
    assert_eq!(table.lookup_innermost("g").unwrap(), None);
}

#[test]
fn test_lookup_any_missing_name() {
    let table = SymbolTable::new();
    assert_eq!(table.lookup_any("nope"), None);
}

#[test]
fn test_empty_table_errors() {
    let mut table = emptied_table();
    assert!(table.is_empty());

    assert_eq!(table.declare("x", int_symbol("x")), Err(SymbolTableError::EmptyTable));
    assert_eq!(table.lookup_innermost("x"), Err(SymbolTableError::EmptyTable));
    assert_eq!(table.pop_scope(), Err(SymbolTableError::EmptyTable));
}

#[test]
fn test_lookup_any_on_empty_table_is_not_found() {
    let table = emptied_table();
    assert_eq!(table.lookup_any("x"), None);
}

#[test]
fn test_push_after_empty_recovers() {
    let mut table = emptied_table();
    table.push_scope();

    table.declare("x", int_symbol("x")).unwrap();
    assert!(table.lookup_any("x").is_some());
}

#[test]
fn test_null_arguments() {
    let mut table = SymbolTable::new();

    assert_eq!(table.declare("", int_symbol("x")), Err(SymbolTableError::NullArgument));
    assert_eq!(table.declare("x", int_symbol("")), Err(SymbolTableError::NullArgument));
    assert!(table.innermost_symbols().is_empty());
}

#[test]
fn test_dump_lists_innermost_first() {
    let mut table = SymbolTable::new();
    table.declare("b", bool_symbol("b")).unwrap();
    table.declare("a", int_symbol("a")).unwrap();
    table.push_scope();
    table.declare("c", int_symbol("c")).unwrap();

    assert_eq!(
        table.dump(),
        "Sym Table\nscope 1: {c=(int)c}\nscope 0: {a=(int)a, b=(bool)b}\n"
    );
}

#[test]
fn test_function_signature_rendering() {
    let signature = FunctionSignature::new(
        TypeDescriptor::Void,
        vec![TypeDescriptor::Int, TypeDescriptor::Bool],
    );
    let f = Symbol::function("f", signature, Span::point(1, 6));

    assert_eq!(f.type_descriptor(), "int,bool->void");
    assert_eq!(f.to_string(), "(int,bool->void)f");
    assert_eq!(f.signature().map(FunctionSignature::arity), Some(2));
    assert_eq!(f.typ, TypeDescriptor::Void);

    let main = Symbol::function("main", FunctionSignature::new(TypeDescriptor::Int, vec![]), Span::point(1, 5));
    assert_eq!(main.type_descriptor(), "->int");
}

#[test]
fn test_symbol_display() {
    assert_eq!(int_symbol("count").to_string(), "(int)count");

    let point = Symbol::structure("Point", Span::point(1, 8));
    assert_eq!(point.typ, TypeDescriptor::Struct("Point".to_string()));
    assert_eq!(point.to_string(), "(Point)Point");
    assert!(!point.is_function());
}

#[test]
fn test_struct_registry() {
    let mut registry = StructRegistry::new();
    let mut fields = SymbolTable::new();
    fields.declare("x", int_symbol("x")).unwrap();

    registry
        .register(StructInfo {
            symbol: Rc::new(Symbol::structure("Point", Span::point(1, 8))),
            fields,
        })
        .unwrap();

    assert!(registry.contains("Point"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("Point").unwrap().name, "Point");
    assert!(registry.get("Point").unwrap().field("x").is_some());
    assert!(registry.get("Point").unwrap().field("y").is_none());

    let again = registry.register(StructInfo {
        symbol: Rc::new(Symbol::structure("Point", Span::point(5, 8))),
        fields: SymbolTable::new(),
    });
    assert_eq!(again, Err(SymbolTableError::DuplicateName("Point".to_string())));
}

#[test]
fn test_independent_tables_do_not_share_state() {
    let mut first = SymbolTable::new();
    let second = SymbolTable::new();
    first.declare("x", int_symbol("x")).unwrap();

    assert!(second.lookup_any("x").is_none());
}

use std::io::Write;

use arch::vm::{ArithOp, Segment};

use crate::error::{Error, TokenInfo};
use crate::grammer::cursor::Cursor;
use crate::grammer::token::{Keyword, Pos, Symbol, Token, TokenKind};
use crate::symbols::{Kind, SymbolTable, Variable};
use crate::vmwriter::VmWriter;
use crate::{check, expect, kw, optional, sym};

/// Recursive-descent compiler for one class.
/// Each `compile_*` method parses one nonterminal and emits its VM code.
pub struct CompilationEngine<I, W>
where
    I: Iterator<Item = Result<Token, Error>>,
    W: Write,
{
    cursor: Cursor<I>,
    writer: VmWriter<W>,
    class_name: String,
    class_scope: SymbolTable,
    sub_scope: SymbolTable,
    sub_kind: Keyword,
    label_count: usize,
}

impl<I, W> CompilationEngine<I, W>
where
    I: Iterator<Item = Result<Token, Error>>,
    W: Write,
{
    pub fn new(tokens: I, out: W) -> Self {
        CompilationEngine {
            cursor: Cursor::new(tokens),
            writer: VmWriter::new(out),
            class_name: String::new(),
            class_scope: SymbolTable::new(),
            sub_scope: SymbolTable::new(),
            sub_kind: Keyword::Function,
            label_count: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn next_label(&mut self) -> usize {
        let n = self.label_count;
        self.label_count += 1;
        n
    }

    /// Subroutine scope first, then class scope.
    fn lookup(&self, name: &str) -> Option<&Variable> {
        self.sub_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    fn resolve(&self, name: &str, pos: Pos) -> Result<Variable, Error> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedVariable(name.to_string(), pos))
    }

    // ------------------------------------------------------------------------
    // Program structure

    /// 'class' className '{' classVarDec* subroutineDec* '}'
    pub fn compile_class(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::Class)?;
        let (name, _) = self.cursor.expect_ident("class name")?;
        self.class_name = name;
        self.class_scope.reset();
        self.cursor.expect_symbol(Symbol::LCurly)?;
        while check!(self.cursor, kw!(Static) | kw!(Field)) {
            self.compile_class_var_dec()?;
        }
        while check!(self.cursor, kw!(Constructor) | kw!(Function) | kw!(Method)) {
            self.compile_subroutine()?;
        }
        self.cursor.expect_symbol(Symbol::RCurly)?;
        self.cursor.finish()
    }

    /// ('static' | 'field') type varName (',' varName)* ';'
    fn compile_class_var_dec(&mut self) -> Result<(), Error> {
        let token = expect!(self.cursor, kw!(Static) | kw!(Field), "`static` or `field`")?;
        let kind = match token.keyword() {
            Some(Keyword::Static) => Kind::Static,
            _ => Kind::Field,
        };
        let ty = self.compile_type()?;
        loop {
            let (name, _) = self.cursor.expect_ident("variable name")?;
            self.class_scope.define(&name, &ty, kind);
            if optional!(self.cursor, sym!(Comma)).is_none() {
                break;
            }
        }
        self.cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }

    /// 'int' | 'char' | 'boolean' | className
    fn compile_type(&mut self) -> Result<String, Error> {
        let token = expect!(
            self.cursor,
            kw!(Int) | kw!(Char) | kw!(Boolean) | TokenKind::Ident(_),
            "type"
        )?;
        Ok(match token.kind {
            TokenKind::Ident(name) => name,
            kind => match token_text(&kind) {
                Some(text) => text,
                None => return Err(unexpected("type", &Token::new(kind, token.pos))),
            },
        })
    }

    /// ('constructor' | 'function' | 'method') ('void' | type) subroutineName
    /// '(' parameterList ')' subroutineBody
    fn compile_subroutine(&mut self) -> Result<(), Error> {
        let token = expect!(
            self.cursor,
            kw!(Constructor) | kw!(Function) | kw!(Method),
            "subroutine declaration"
        )?;
        self.sub_kind = token.keyword().unwrap_or(Keyword::Function);
        self.sub_scope.reset();
        if self.sub_kind == Keyword::Method {
            let class_name = self.class_name.clone();
            self.sub_scope.define("this", &class_name, Kind::Argument);
        }

        if optional!(self.cursor, kw!(Void)).is_none() {
            self.compile_type()?;
        }
        let (name, _) = self.cursor.expect_ident("subroutine name")?;
        self.cursor.expect_symbol(Symbol::LParen)?;
        self.compile_parameter_list()?;
        self.cursor.expect_symbol(Symbol::RParen)?;
        self.compile_subroutine_body(&name)
    }

    /// ((type varName) (',' type varName)*)?
    fn compile_parameter_list(&mut self) -> Result<(), Error> {
        if check!(self.cursor, sym!(RParen)) {
            return Ok(());
        }
        loop {
            let ty = self.compile_type()?;
            let (name, _) = self.cursor.expect_ident("parameter name")?;
            self.sub_scope.define(&name, &ty, Kind::Argument);
            if optional!(self.cursor, sym!(Comma)).is_none() {
                return Ok(());
            }
        }
    }

    /// '{' varDec* statements '}'
    fn compile_subroutine_body(&mut self, name: &str) -> Result<(), Error> {
        self.cursor.expect_symbol(Symbol::LCurly)?;
        while check!(self.cursor, kw!(Var)) {
            self.compile_var_dec()?;
        }

        let locals = self.sub_scope.var_count(Kind::Local);
        self.writer
            .write_function(&format!("{}.{}", self.class_name, name), locals)?;
        match self.sub_kind {
            Keyword::Constructor => {
                let fields = self.class_scope.var_count(Kind::Field);
                self.writer.write_push(Segment::Constant, fields)?;
                self.writer.write_call("Memory.alloc", 1)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            Keyword::Method => {
                self.writer.write_push(Segment::Argument, 0)?;
                self.writer.write_pop(Segment::Pointer, 0)?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.cursor.expect_symbol(Symbol::RCurly)?;
        Ok(())
    }

    /// 'var' type varName (',' varName)* ';'
    fn compile_var_dec(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::Var)?;
        let ty = self.compile_type()?;
        loop {
            let (name, _) = self.cursor.expect_ident("variable name")?;
            self.sub_scope.define(&name, &ty, Kind::Local);
            if optional!(self.cursor, sym!(Comma)).is_none() {
                break;
            }
        }
        self.cursor.expect_symbol(Symbol::Semicolon)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Statements

    fn compile_statements(&mut self) -> Result<(), Error> {
        loop {
            match self.cursor.peek().and_then(|t| t.keyword()) {
                Some(Keyword::Let) => self.compile_let()?,
                Some(Keyword::If) => self.compile_if()?,
                Some(Keyword::While) => self.compile_while()?,
                Some(Keyword::Do) => self.compile_do()?,
                Some(Keyword::Return) => self.compile_return()?,
                _ => return Ok(()),
            }
        }
    }

    /// 'let' varName ('[' expression ']')? '=' expression ';'
    fn compile_let(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::Let)?;
        let (name, pos) = self.cursor.expect_ident("variable name")?;
        let var = self.resolve(&name, pos)?;

        if optional!(self.cursor, sym!(LBracket)).is_some() {
            self.writer.write_push(var.segment(), var.index)?;
            self.compile_expression()?;
            self.cursor.expect_symbol(Symbol::RBracket)?;
            self.writer.write_arithmetic(ArithOp::Add)?;
            self.cursor.expect_symbol(Symbol::Equal)?;
            self.compile_expression()?;
            self.cursor.expect_symbol(Symbol::Semicolon)?;
            self.writer.write_pop(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::Temp, 0)?;
            self.writer.write_pop(Segment::That, 0)?;
        } else {
            self.cursor.expect_symbol(Symbol::Equal)?;
            self.compile_expression()?;
            self.cursor.expect_symbol(Symbol::Semicolon)?;
            self.writer.write_pop(var.segment(), var.index)?;
        }
        Ok(())
    }

    /// 'if' '(' expression ')' '{' statements '}' ('else' '{' statements '}')?
    fn compile_if(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::If)?;
        let n = self.next_label();
        let else_label = format!("ELSE{}", n);
        let end_label = format!("ENDIF{}", n);

        self.compile_condition()?;
        self.writer.write_arithmetic(ArithOp::Not)?;
        self.writer.write_if(&else_label)?;
        self.compile_block()?;
        self.writer.write_goto(&end_label)?;
        self.writer.write_label(&else_label)?;
        if optional!(self.cursor, kw!(Else)).is_some() {
            self.compile_block()?;
        }
        self.writer.write_label(&end_label)?;
        Ok(())
    }

    /// 'while' '(' expression ')' '{' statements '}'
    fn compile_while(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::While)?;
        let n = self.next_label();
        let loop_label = format!("LOOP{}", n);
        let end_label = format!("ENDLOOP{}", n);

        self.writer.write_label(&loop_label)?;
        self.compile_condition()?;
        self.writer.write_arithmetic(ArithOp::Not)?;
        self.writer.write_if(&end_label)?;
        self.compile_block()?;
        self.writer.write_goto(&loop_label)?;
        self.writer.write_label(&end_label)?;
        Ok(())
    }

    /// '(' expression ')'
    fn compile_condition(&mut self) -> Result<(), Error> {
        self.cursor.expect_symbol(Symbol::LParen)?;
        self.compile_expression()?;
        self.cursor.expect_symbol(Symbol::RParen)?;
        Ok(())
    }

    /// '{' statements '}'
    fn compile_block(&mut self) -> Result<(), Error> {
        self.cursor.expect_symbol(Symbol::LCurly)?;
        self.compile_statements()?;
        self.cursor.expect_symbol(Symbol::RCurly)?;
        Ok(())
    }

    /// 'do' subroutineCall ';'
    fn compile_do(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::Do)?;
        let (name, _) = self.cursor.expect_ident("subroutine call")?;
        self.compile_call(&name)?;
        self.cursor.expect_symbol(Symbol::Semicolon)?;
        self.writer.write_pop(Segment::Temp, 0)?;
        Ok(())
    }

    /// 'return' expression? ';'
    fn compile_return(&mut self) -> Result<(), Error> {
        self.cursor.expect_keyword(Keyword::Return)?;
        if check!(self.cursor, sym!(Semicolon)) {
            self.writer.write_push(Segment::Constant, 0)?;
        } else {
            self.compile_expression()?;
        }
        self.cursor.expect_symbol(Symbol::Semicolon)?;
        self.writer.write_return()?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Expressions

    /// term (op term)*, evaluated left to right.
    fn compile_expression(&mut self) -> Result<(), Error> {
        self.compile_term()?;
        while let Some(op) = self.binary_op() {
            self.cursor.next();
            self.compile_term()?;
            match op {
                Symbol::Star => self.writer.write_call("Math.multiply", 2)?,
                Symbol::Slash => self.writer.write_call("Math.divide", 2)?,
                Symbol::Plus => self.writer.write_arithmetic(ArithOp::Add)?,
                Symbol::Minus => self.writer.write_arithmetic(ArithOp::Sub)?,
                Symbol::Ampasand => self.writer.write_arithmetic(ArithOp::And)?,
                Symbol::Pipe => self.writer.write_arithmetic(ArithOp::Or)?,
                Symbol::LAngle => self.writer.write_arithmetic(ArithOp::Lt)?,
                Symbol::RAngle => self.writer.write_arithmetic(ArithOp::Gt)?,
                _ => self.writer.write_arithmetic(ArithOp::Eq)?,
            }
        }
        Ok(())
    }

    fn binary_op(&self) -> Option<Symbol> {
        use Symbol::*;
        self.cursor
            .peek()
            .and_then(|t| t.symbol())
            .filter(|s| matches!(s, Plus | Minus | Star | Slash | Ampasand | Pipe | LAngle | RAngle | Equal))
    }

    fn compile_term(&mut self) -> Result<(), Error> {
        let token = expect!(
            self.cursor,
            TokenKind::IntConst(_)
                | TokenKind::StrConst(_)
                | TokenKind::Ident(_)
                | kw!(True)
                | kw!(False)
                | kw!(Null)
                | kw!(This)
                | sym!(LParen)
                | sym!(Minus)
                | sym!(Tilde),
            "term"
        )?;

        match token.kind {
            TokenKind::IntConst(v) => self.writer.write_push(Segment::Constant, v)?,
            TokenKind::StrConst(s) => self.compile_string(&s)?,
            kw!(True) => {
                self.writer.write_push(Segment::Constant, 1)?;
                self.writer.write_arithmetic(ArithOp::Neg)?;
            }
            kw!(False) | kw!(Null) => self.writer.write_push(Segment::Constant, 0)?,
            kw!(This) => self.writer.write_push(Segment::Pointer, 0)?,
            sym!(LParen) => {
                self.compile_expression()?;
                self.cursor.expect_symbol(Symbol::RParen)?;
            }
            sym!(Minus) => {
                self.compile_term()?;
                self.writer.write_arithmetic(ArithOp::Neg)?;
            }
            sym!(Tilde) => {
                self.compile_term()?;
                self.writer.write_arithmetic(ArithOp::Not)?;
            }
            TokenKind::Ident(name) => self.compile_name(&name, token.pos)?,
            kind => return Err(unexpected("term", &Token::new(kind, token.pos))),
        }
        Ok(())
    }

    /// Identifier in a term; the next token decides what it names.
    fn compile_name(&mut self, name: &str, pos: Pos) -> Result<(), Error> {
        if optional!(self.cursor, sym!(LBracket)).is_some() {
            let var = self.resolve(name, pos)?;
            self.writer.write_push(var.segment(), var.index)?;
            self.compile_expression()?;
            self.cursor.expect_symbol(Symbol::RBracket)?;
            self.writer.write_arithmetic(ArithOp::Add)?;
            self.writer.write_pop(Segment::Pointer, 1)?;
            self.writer.write_push(Segment::That, 0)?;
        } else if check!(self.cursor, sym!(Period) | sym!(LParen)) {
            self.compile_call(name)?;
        } else {
            let var = self.resolve(name, pos)?;
            self.writer.write_push(var.segment(), var.index)?;
        }
        Ok(())
    }

    /// Rest of a subroutine call after its leading identifier:
    /// `'(' expressionList ')'` or `'.' subroutineName '(' expressionList ')'`.
    fn compile_call(&mut self, name: &str) -> Result<(), Error> {
        let (target, receiver) = if optional!(self.cursor, sym!(Period)).is_some() {
            let (sub, _) = self.cursor.expect_ident("subroutine name")?;
            match self.lookup(name).cloned() {
                Some(var) => {
                    self.writer.write_push(var.segment(), var.index)?;
                    (format!("{}.{}", var.ty, sub), 1)
                }
                None => (format!("{}.{}", name, sub), 0),
            }
        } else {
            self.writer.write_push(Segment::Pointer, 0)?;
            (format!("{}.{}", self.class_name, name), 1)
        };

        self.cursor.expect_symbol(Symbol::LParen)?;
        let args = self.compile_expression_list()?;
        self.cursor.expect_symbol(Symbol::RParen)?;
        self.writer.write_call(&target, args + receiver)?;
        Ok(())
    }

    /// (expression (',' expression)*)?, returns the number of expressions.
    fn compile_expression_list(&mut self) -> Result<u16, Error> {
        if check!(self.cursor, sym!(RParen)) {
            return Ok(0);
        }
        let mut count = 1;
        self.compile_expression()?;
        while optional!(self.cursor, sym!(Comma)).is_some() {
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }

    fn compile_string(&mut self, s: &str) -> Result<(), Error> {
        self.writer
            .write_push(Segment::Constant, s.chars().count() as u16)?;
        self.writer.write_call("String.new", 1)?;
        for c in s.chars() {
            self.writer.write_push(Segment::Constant, u32::from(c) as u16)?;
            self.writer.write_call("String.appendChar", 2)?;
        }
        Ok(())
    }
}

fn token_text(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Keyword(kw) => Some(kw.to_string()),
        TokenKind::Ident(name) => Some(name.clone()),
        _ => None,
    }
}

fn unexpected(expected: &str, token: &Token) -> Error {
    Error::UnexpectedToken {
        expected: expected.to_string(),
        found: TokenInfo::from(token),
    }
}
